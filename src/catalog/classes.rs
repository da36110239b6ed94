use std::cell::Cell;

use crate::errors::Result;
use crate::registry::Registry;

const FULL_NAME_MAX_LENGTH: usize = 10;

trait Animal {
    fn name(&self) -> &str;

    fn default_distance(&self) -> u32 {
        0
    }

    fn move_by(&self, distance: Option<u32>) -> String {
        let distance = distance.unwrap_or_else(|| self.default_distance());
        format!("{} moved {distance}m.", self.name())
    }
}

struct Snake {
    name: String,
}

impl Animal for Snake {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_distance(&self) -> u32 {
        5
    }

    fn move_by(&self, distance: Option<u32>) -> String {
        let distance = distance.unwrap_or_else(|| self.default_distance());
        format!("Slithering...{} moved {distance}m.", self.name)
    }
}

struct Horse {
    name: String,
}

impl Animal for Horse {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_distance(&self) -> u32 {
        45
    }

    fn move_by(&self, distance: Option<u32>) -> String {
        let distance = distance.unwrap_or_else(|| self.default_distance());
        format!("Galloping...{} moved {distance}m.", self.name)
    }
}

struct Employee {
    full_name: String,
}

impl Employee {
    fn new() -> Self {
        Self {
            full_name: String::new(),
        }
    }

    fn full_name(&self) -> &str {
        &self.full_name
    }

    fn set_full_name(&mut self, name: &str) -> std::result::Result<(), String> {
        if name.chars().count() > FULL_NAME_MAX_LENGTH {
            return Err(format!("fullName has a max length of {FULL_NAME_MAX_LENGTH}"));
        }
        self.full_name = name.to_string();
        Ok(())
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Classes", |s| {
        s.case("constructor and method", |t| {
            struct Greeter {
                greeting: String,
            }
            impl Greeter {
                fn new(message: &str) -> Self {
                    Self {
                        greeting: message.to_string(),
                    }
                }
                fn greet(&self) -> String {
                    format!("Hello, {}", self.greeting)
                }
            }
            t.assert_same(Greeter::new("world").greet(), "Hello, world")?;
            Ok(())
        })?;

        s.case("overriding a provided method", |t| {
            let sam = Snake {
                name: "Sammy the Python".to_string(),
            };
            let tom: Box<dyn Animal> = Box::new(Horse {
                name: "Tommy the Palomino".to_string(),
            });
            t.assert_same(sam.move_by(None), "Slithering...Sammy the Python moved 5m.")?;
            t.assert_same(sam.name(), "Sammy the Python")?;
            t.assert_same(
                tom.move_by(Some(34)),
                "Galloping...Tommy the Palomino moved 34m.",
            )?;
            t.assert_same(tom.name(), "Tommy the Palomino")?;
            Ok(())
        })?;

        s.case("default trait method", |t| {
            struct Dog;
            impl Animal for Dog {
                fn name(&self) -> &str {
                    "Dog"
                }
            }
            t.assert_same(Dog.move_by(Some(10)), "Dog moved 10m.")?;
            t.assert_same(Dog.move_by(None), "Dog moved 0m.")?;
            Ok(())
        })?;

        s.case("accessors validate on write", |t| {
            let mut employee = Employee::new();
            employee
                .set_full_name("Bob Smith")
                .map_err(crate::errors::CaseError::fault)?;
            t.assert_same(employee.full_name(), "Bob Smith")?;
            t.assert_throws_matching(
                || employee.set_full_name("Bob Smithsonian"),
                "max length of 10",
            )?;
            t.assert_same(employee.full_name(), "Bob Smith")?;
            Ok(())
        })?;

        s.case("associated constants", |t| {
            struct Grid {
                scale: f64,
            }
            impl Grid {
                const ORIGIN: (f64, f64) = (0.0, 0.0);

                fn distance_from_origin(&self, point: (f64, f64)) -> f64 {
                    let dx = point.0 - Self::ORIGIN.0;
                    let dy = point.1 - Self::ORIGIN.1;
                    (dx * dx + dy * dy).sqrt() / self.scale
                }
            }

            let grid1 = Grid { scale: 1.0 };
            let grid2 = Grid { scale: 5.0 };
            t.assert_same(grid1.distance_from_origin((10.0, 10.0)), 14.142135623730951)?;
            t.assert_same(grid2.distance_from_origin((10.0, 10.0)), 2.8284271247461903)?;
            Ok(())
        })?;

        s.case("abstract methods are required trait methods", |t| {
            trait Department {
                fn name(&self) -> &str;
                fn print_meeting(&self) -> String;
                fn print_name(&self) -> String {
                    format!("Department name: {}", self.name())
                }
            }
            struct Accounting;
            impl Department for Accounting {
                fn name(&self) -> &str {
                    "Accounting and Auditing"
                }
                fn print_meeting(&self) -> String {
                    "The Accounting Department meets each Monday at 10am.".to_string()
                }
            }

            let department: &dyn Department = &Accounting;
            t.assert_same(
                department.print_name(),
                "Department name: Accounting and Auditing",
            )?;
            t.assert_same(
                department.print_meeting(),
                "The Accounting Department meets each Monday at 10am.",
            )?;
            Ok(())
        })?;

        s.case("interior mutability for class-level defaults", |t| {
            struct GreeterMaker {
                standard_greeting: Cell<&'static str>,
            }
            impl GreeterMaker {
                fn greet(&self, greeting: Option<&str>) -> String {
                    match greeting {
                        Some(greeting) => format!("Hello, {greeting}"),
                        None => self.standard_greeting.get().to_string(),
                    }
                }
            }

            let maker = GreeterMaker {
                standard_greeting: Cell::new("Hello, there"),
            };
            t.assert_same(maker.greet(None), "Hello, there")?;
            maker.standard_greeting.set("Hey there!");
            t.assert_same(maker.greet(None), "Hey there!")?;
            t.assert_same(maker.greet(Some("world")), "Hello, world")?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

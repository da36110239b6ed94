use std::ops::Add;

use crate::errors::Result;
use crate::registry::Registry;
use crate::value::{Object, Value};
use crate::{array, object};

fn identity<T>(arg: T) -> T {
    arg
}

trait Lengthwise {
    fn length(&self) -> usize;
}

impl Lengthwise for &str {
    fn length(&self) -> usize {
        self.chars().count()
    }
}

impl<T> Lengthwise for Vec<T> {
    fn length(&self) -> usize {
        self.len()
    }
}

fn logging_identity<T: Lengthwise>(arg: T) -> usize {
    arg.length()
}

struct GenericNumber<T> {
    zero_value: T,
    add: fn(T, T) -> T,
}

fn sum<T: Add<Output = T>>(x: T, y: T) -> T {
    x + y
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Generics", |s| {
        s.case("identity", |t| {
            t.assert_same(identity::<&str>("myString"), "myString")?;
            t.assert_same(identity("MySecondString"), "MySecondString")?;
            let my_identity: fn(&'static str) -> &'static str = identity;
            t.assert_same(my_identity("myString"), "myString")?;
            Ok(())
        })?;

        s.case("generic slices", |t| {
            fn first_of<T: Clone>(items: &[T]) -> Option<T> {
                items.first().cloned()
            }
            let numbers = vec![1, 2, 3];
            t.assert_strict_equal(identity(numbers.clone()), array![1, 2, 3])?;
            t.assert_same(first_of(&numbers).unwrap_or_default(), 1)?;
            t.assert_undefined(first_of::<i32>(&[]).map_or(Value::Undefined, Value::from))?;
            Ok(())
        })?;

        s.case("generic structs", |t| {
            let numeric = GenericNumber {
                zero_value: 0,
                add: sum::<i32>,
            };
            t.assert_same((numeric.add)(3, 4), 7)?;
            t.assert_same((numeric.add)(numeric.zero_value, 4), 4)?;

            let textual = GenericNumber {
                zero_value: String::new(),
                add: |x: String, y: String| x + &y,
            };
            t.assert_same((textual.add)(textual.zero_value.clone(), "test".to_string()), "test")?;
            Ok(())
        })?;

        s.case("trait bounds", |t| {
            t.assert_same(logging_identity("test"), 4)?;
            t.assert_same(logging_identity(vec![1, 2, 3]), 3)?;
            Ok(())
        })?;

        s.case("keys of a value", |t| {
            fn get_property(object: &Object, key: &str) -> Value {
                object.get(key).cloned().unwrap_or_default()
            }
            let x = Object::new().with("a", 1).with("b", 2).with("c", 3).with("d", 4);
            t.assert_same(get_property(&x, "a"), 1)?;
            t.assert_undefined(get_property(&x, "m"))?;
            Ok(())
        })?;

        s.case("constructing through a bound", |t| {
            trait Keeper {
                fn describe(&self) -> Value;
            }
            #[derive(Default)]
            struct BeeKeeper {
                has_mask: Option<bool>,
            }
            #[derive(Default)]
            struct ZooKeeper {
                nametag: Option<String>,
            }
            impl Keeper for BeeKeeper {
                fn describe(&self) -> Value {
                    object! { "hasMask" => self.has_mask.map_or(Value::Undefined, Value::from) }
                }
            }
            impl Keeper for ZooKeeper {
                fn describe(&self) -> Value {
                    object! { "nametag" => self.nametag.clone().map_or(Value::Undefined, Value::from) }
                }
            }
            fn create_instance<K: Keeper + Default>() -> K {
                K::default()
            }

            let lion = create_instance::<ZooKeeper>().describe();
            let bee = create_instance::<BeeKeeper>().describe();
            t.assert_undefined(lion.get("nametag"))?;
            t.assert_undefined(bee.get("hasMask"))?;
            t.assert_equal(lion, object! {})?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

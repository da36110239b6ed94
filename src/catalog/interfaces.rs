//! Capability traits in place of structural interfaces.

use crate::errors::Result;
use crate::object;
use crate::registry::Registry;
use crate::value::Value;

/// Anything that carries a label.
trait Labelled {
    fn label(&self) -> &str;
}

struct SizedLabel {
    size: u32,
    label: String,
}

impl Labelled for SizedLabel {
    fn label(&self) -> &str {
        &self.label
    }
}

fn print_label(labelled: &dyn Labelled) -> String {
    labelled.label().to_string()
}

#[derive(Default)]
struct SquareConfig {
    color: Option<&'static str>,
    width: Option<u32>,
}

fn create_square(config: SquareConfig) -> Value {
    let color = config.color.unwrap_or("white");
    let area = config.width.map_or(100, |width| width * width);
    object! { "color" => color, "area" => area }
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Interfaces", |s| {
        s.case("a trait describes the required capability", |t| {
            let my_obj = SizedLabel {
                size: 10,
                label: "Size 10 Object".to_string(),
            };
            t.assert_same(print_label(&my_obj), "Size 10 Object")?;
            t.assert_same(my_obj.size, 10)?;
            Ok(())
        })?;

        s.case("optional properties", |t| {
            let black = create_square(SquareConfig {
                color: Some("black"),
                ..SquareConfig::default()
            });
            t.assert_strict_equal(black, object! { "color" => "black", "area" => 100 })?;

            let wide = create_square(SquareConfig {
                width: Some(5),
                ..SquareConfig::default()
            });
            t.assert_strict_equal(wide, object! { "color" => "white", "area" => 25 })?;
            Ok(())
        })?;

        s.case("read-only fields", |t| {
            struct Point {
                x: i32,
                y: i32,
            }
            let p1 = Point { x: 10, y: 20 };
            t.assert_same(p1.x, 10)?;
            t.assert_same(p1.y, 20)?;
            Ok(())
        })?;

        s.case("read-only views of a vector", |t| {
            let a = vec![1, 2, 3, 4];
            let ro: &[i32] = &a;
            t.assert_strict_equal(ro.to_vec(), a.clone())?;
            Ok(())
        })?;

        s.case("callable types", |t| {
            type SearchFn = fn(&str, &str) -> bool;
            let my_search: SearchFn = |source, sub_string| source.contains(sub_string);
            t.assert_truthy(my_search("fizzbuzz", "buzz"))?;
            t.assert_falsy(my_search("fizzbuzz", "bang"))?;
            Ok(())
        })?;

        s.case("indexable types", |t| {
            let my_array = ["Bob", "Fred"];
            t.assert_same(my_array[0], "Bob")?;
            t.assert_undefined(Value::from(my_array.to_vec()).index(2))?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

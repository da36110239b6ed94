//! Declarations, destructuring and spread.

use crate::errors::Result;
use crate::registry::Registry;
use crate::value::{Object, Value};
use crate::{array, object};

/// Calls a method by name on a plain object. Only instances of `C` carry `m`.
fn invoke(object: &Object, method: &str) -> std::result::Result<Value, String> {
    match (object.class(), method) {
        (Some("C"), "m") => Ok(Value::from("m on C")),
        _ => Err(format!("{method} is not a function")),
    }
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Variable declarations", |s| {
        s.case("block-scoped captures", |t| {
            let mut getters: Vec<Box<dyn Fn() -> usize>> = Vec::new();
            for i in 0..3 {
                getters.push(Box::new(move || i));
            }
            let seen: Vec<usize> = getters.iter().map(|get| get()).collect();
            t.assert_equal(seen, array![0, 1, 2])?;
            Ok(())
        })?;

        s.case("shadowing in nested blocks", |t| {
            let x = 1;
            let inner = {
                let x = x + 10;
                x
            };
            t.assert_same(inner, 11)?;
            t.assert_same(x, 1)?;
            Ok(())
        })?;

        s.case("closures capture their environment", |t| {
            let a = 10;
            let g = move || a + 1;
            t.assert_same(g(), 11)?;
            Ok(())
        })?;

        Ok(())
    })?;

    registry.suite("Destructuring", |s| {
        s.case("array destructuring and swapping", |t| {
            let [first, second] = [1, 2];
            t.assert_same(first, 1)?;
            t.assert_same(second, 2)?;
            let (first, second) = (second, first);
            t.assert_equal(array![first, second], array![2, 1])?;
            Ok(())
        })?;

        s.case("rest elements", |t| {
            let numbers = [1, 2, 3, 4];
            let [first, rest @ ..] = numbers;
            t.assert_same(first, 1)?;
            t.assert_equal(rest.to_vec(), array![2, 3, 4])?;
            Ok(())
        })?;

        s.case("struct destructuring with defaults", |t| {
            struct Options {
                a: &'static str,
                b: Option<i32>,
            }
            fn keep_whole(options: Options) -> (String, i32) {
                let Options { a, b } = options;
                (a.to_string(), b.unwrap_or(1001))
            }

            let (a, b) = keep_whole(Options { a: "foo", b: None });
            t.assert_same(a, "foo")?;
            t.assert_same(b, 1001)?;
            Ok(())
        })?;

        Ok(())
    })?;

    registry.suite("Spread", |s| {
        s.case("array spread", |t| {
            let first = [1, 2];
            let second = [3, 4];
            let both = [&[0][..], &first[..], &second[..], &[5][..]].concat();
            t.assert_strict_equal(both, array![0, 1, 2, 3, 4, 5])?;
            Ok(())
        })?;

        s.case("object spread overrides left to right", |t| {
            let defaults = Object::new()
                .with("food", "spicy")
                .with("price", "$$")
                .with("ambiance", "noisy");
            let search = defaults.spread(&Object::new().with("food", "rich"));
            t.assert_strict_equal(
                search,
                object! { "food" => "rich", "price" => "$$", "ambiance" => "noisy" },
            )?;
            Ok(())
        })?;

        s.case("spread copies properties, not methods", |t| {
            let instance = Object::instance("C").with("p", 12);
            let clone = Object::new().spread(&instance);

            t.assert_same(Value::from(clone.clone()).get("p"), 12)?;
            t.assert_equal(clone.clone(), instance.clone())?;
            t.assert_same(invoke(&instance, "m").unwrap_or_default(), "m on C")?;
            t.assert_throws_matching(|| invoke(&clone, "m"), "is not a function")?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

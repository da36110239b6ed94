use crate::array;
use crate::errors::Result;
use crate::registry::Registry;
use crate::value::Value;

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Basic types", |s| {
        s.case("booleans", |t| {
            let is_done = false;
            t.assert_falsy(is_done)?;
            t.assert_same(!is_done, true)?;
            Ok(())
        })?;

        s.case("number literals in other bases", |t| {
            t.assert_same(6, 6)?;
            t.assert_same(0xf00d, 61453)?;
            t.assert_same(0b1010, 10)?;
            t.assert_same(0o744, 484)?;
            Ok(())
        })?;

        s.case("formatted strings", |t| {
            let full_name = "Bob Bobbington";
            let age = 37;
            let sentence = format!(
                "Hello, my name is {full_name}.\n\nI'll be {} years old next month.",
                age + 1
            );
            let concatenated = "Hello, my name is ".to_string()
                + full_name
                + ".\n\n"
                + "I'll be "
                + &(age + 1).to_string()
                + " years old next month.";
            t.assert_same(sentence, concatenated)?;
            Ok(())
        })?;

        s.case("tuples", |t| {
            let x: (&str, i32) = ("hello", 10);
            t.assert_same(&x.0[1..], "ello")?;
            t.assert_same(x.1, 10)?;
            Ok(())
        })?;

        s.case("heterogeneous arrays", |t| {
            let list = array![1, true, "free"];
            t.assert_same(list.index(0), 1)?;
            t.assert_truthy(list.index(1))?;
            t.assert_same(list.index(2), "free")?;
            t.assert_undefined(list.index(3))?;
            Ok(())
        })?;

        s.case("null and undefined are distinct", |t| {
            let mut slot = Value::Null;
            t.assert_null(slot.clone())?;
            slot = Value::from("set");
            t.assert_not_null(slot)?;

            let unset = Value::default();
            t.assert_undefined(unset.clone())?;
            t.assert_falsy(unset.strict_equals(&Value::Null))?;
            t.assert_falsy(unset.loose_equals(&Value::Null))?;
            Ok(())
        })?;

        s.case("falsy values", |t| {
            let falsy = [
                Value::from(0),
                Value::from(-0.0),
                Value::from(f64::NAN),
                Value::from(""),
                Value::Null,
                Value::Undefined,
                Value::from(false),
            ];
            for value in falsy {
                t.assert_falsy(value)?;
            }
            t.assert_truthy("0")?;
            t.assert_truthy(array![])?;
            Ok(())
        })?;

        s.case("functions that never return", |t| {
            fn error(message: &str) -> ! {
                panic!("{message}")
            }
            t.assert_throws_matching(
                || -> Result<(), String> { error("Something failed") },
                "Something failed",
            )?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

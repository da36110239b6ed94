//! Sum types for unions, merged records for intersections.

use crate::errors::Result;
use crate::registry::Registry;
use crate::value::{Object, Value};
use crate::{array, object};

enum Padding {
    Spaces(usize),
    Text(&'static str),
}

fn pad_left(value: &str, padding: Padding) -> String {
    match padding {
        Padding::Spaces(count) => format!("{}{value}", " ".repeat(count)),
        Padding::Text(prefix) => format!("{prefix}{value}"),
    }
}

enum NetworkState {
    Loading,
    Failed { code: u16 },
    Success { title: String, summary: String },
}

fn network_status(state: &NetworkState) -> String {
    match state {
        NetworkState::Loading => "Downloading...".to_string(),
        NetworkState::Failed { code } => format!("Error {code} downloading"),
        NetworkState::Success { title, summary } => format!("Downloaded {title} - {summary}"),
    }
}

/// Merges two records; properties of `second` win.
fn extend(first: &Object, second: &Object) -> Object {
    first.spread(second)
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Unions and intersections", |s| {
        s.case("union parameters", |t| {
            t.assert_same(pad_left("Hello world", Padding::Spaces(4)), "    Hello world")?;
            t.assert_same(pad_left("Hello world", Padding::Text(">> ")), ">> Hello world")?;
            Ok(())
        })?;

        s.case("common capabilities", |t| {
            trait LaysEggs {
                fn lay_eggs(&self) -> &'static str;
            }
            struct Fish;
            struct Bird;
            impl LaysEggs for Fish {
                fn lay_eggs(&self) -> &'static str {
                    "roe"
                }
            }
            impl LaysEggs for Bird {
                fn lay_eggs(&self) -> &'static str {
                    "eggs"
                }
            }
            let pets: [&dyn LaysEggs; 2] = [&Fish, &Bird];
            let laid: Vec<&str> = pets.iter().map(|pet| pet.lay_eggs()).collect();
            t.assert_equal(laid, array!["roe", "eggs"])?;
            Ok(())
        })?;

        s.case("discriminated unions", |t| {
            t.assert_same(network_status(&NetworkState::Loading), "Downloading...")?;
            t.assert_same(
                network_status(&NetworkState::Failed { code: 503 }),
                "Error 503 downloading",
            )?;
            t.assert_same(
                network_status(&NetworkState::Success {
                    title: "Casebook".to_string(),
                    summary: "all green".to_string(),
                }),
                "Downloaded Casebook - all green",
            )?;
            Ok(())
        })?;

        s.case("intersections merge records", |t| {
            let error_handling = Object::new().with("success", true);
            let artists = Object::new().with("artists", array![object! { "name" => "test" }]);
            let response = Value::from(extend(&artists, &error_handling));

            t.assert_match_object(
                response.clone(),
                object! { "success" => true, "artists" => array![object! { "name" => "test" }] },
            )?;
            t.assert_undefined(response.get("error"))?;
            Ok(())
        })?;

        s.case("type guards", |t| {
            enum Pet {
                Fish,
                Bird,
            }
            fn movement(pet: &Pet) -> &'static str {
                match pet {
                    Pet::Fish => "swim",
                    Pet::Bird => "fly",
                }
            }
            t.assert_same(movement(&Pet::Fish), "swim")?;
            t.assert_same(movement(&Pet::Bird), "fly")?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

use crate::errors::Result;
use crate::object;
use crate::registry::Registry;
use crate::value::{Object, Value};

fn todo() -> Object {
    Object::new()
        .with("title", "Clean room")
        .with("description", "Task")
        .with("completed", false)
}

/// Keeps only `keys` of `object`.
fn pick(object: &Object, keys: &[&str]) -> Object {
    keys.iter().fold(Object::new(), |picked, key| match object.get(key) {
        Some(value) => picked.with(*key, value.clone()),
        None => picked,
    })
}

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Utility types", |s| {
        s.case("partial updates", |t| {
            #[derive(Debug, Clone, PartialEq)]
            struct Todo {
                title: String,
                description: String,
            }
            #[derive(Default)]
            struct TodoUpdate {
                title: Option<String>,
                description: Option<String>,
            }
            fn update_todo(todo: &Todo, fields: TodoUpdate) -> Todo {
                Todo {
                    title: fields.title.unwrap_or_else(|| todo.title.clone()),
                    description: fields.description.unwrap_or_else(|| todo.description.clone()),
                }
            }

            let todo1 = Todo {
                title: "organize desk".to_string(),
                description: "clear clutter".to_string(),
            };
            let todo2 = update_todo(
                &todo1,
                TodoUpdate {
                    description: Some("throw out trash".to_string()),
                    ..TodoUpdate::default()
                },
            );
            t.assert_same(todo2.title, "organize desk")?;
            t.assert_same(todo2.description, "throw out trash")?;
            Ok(())
        })?;

        s.case("partial updates on records", |t| {
            let todo1 = Object::new()
                .with("title", "organize desk")
                .with("description", "clear clutter");
            let todo2 = todo1.spread(&Object::new().with("description", "throw out trash"));
            t.assert_strict_equal(
                todo2,
                object! { "title" => "organize desk", "description" => "throw out trash" },
            )?;
            Ok(())
        })?;

        s.case("record keyed by a closed set", |t| {
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            enum Page {
                Home,
                About,
                Contact,
            }
            let pages: std::collections::BTreeMap<Page, &str> =
                [(Page::About, "about"), (Page::Contact, "contact"), (Page::Home, "home")]
                    .into_iter()
                    .collect();
            let titles: Vec<&str> = pages.values().copied().collect();
            t.assert_equal(titles, vec!["home", "about", "contact"])?;
            Ok(())
        })?;

        s.case("pick", |t| {
            let preview = pick(&todo(), &["title", "completed"]);
            t.assert_strict_equal(
                preview.clone(),
                object! { "title" => "Clean room", "completed" => false },
            )?;
            t.assert_undefined(Value::from(preview).get("description"))?;
            Ok(())
        })?;

        s.case("omit", |t| {
            let preview = todo().without("description");
            t.assert_strict_equal(
                preview.clone(),
                object! { "title" => "Clean room", "completed" => false },
            )?;
            t.assert_not_null(Value::from(preview))?;
            Ok(())
        })?;

        s.case("match a subset of a record", |t| {
            t.assert_match_object(todo(), object! { "title" => "Clean room" })?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

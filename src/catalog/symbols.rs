use std::collections::HashMap;

use crate::errors::Result;
use crate::registry::Registry;
use crate::value::{Symbol, Value};

pub(super) fn register(registry: &mut Registry) -> Result<()> {
    registry.suite("Symbols", |s| {
        s.case("symbols are unique", |t| {
            let sym2 = Value::symbol("key");
            let sym3 = Value::symbol("key");
            t.assert_falsy(sym2.same_value(&sym3))?;
            t.assert_truthy(sym2.same_value(&sym2.clone()))?;
            Ok(())
        })?;

        s.case("symbols keep their description", |t| {
            let sym = Symbol::new(Some("key"));
            t.assert_same(sym.description().unwrap_or_default(), "key")?;
            t.assert_same(sym.to_string(), "Symbol(key)")?;
            t.assert_undefined(Symbol::new(None).description().map_or(Value::Undefined, Value::from))?;
            Ok(())
        })?;

        s.case("symbols as member keys", |t| {
            let get_class_name = Symbol::new(None);
            let mut members: HashMap<Symbol, fn() -> &'static str> = HashMap::new();
            members.insert(get_class_name.clone(), || "C");

            let class_name = members.get(&get_class_name).map(|member| member());
            t.assert_same(class_name.unwrap_or_default(), "C")?;
            t.assert_truthy(members.get(&Symbol::new(None)).is_none())?;
            Ok(())
        })?;

        Ok(())
    })?;
    Ok(())
}

use crate::copy::{RefValue, Type, Value};

/// Follow references to the first non-reference value; `None` on a null link.
pub(crate) fn indirect(value: &Value) -> Option<&Value> {
	match value {
		Value::Ref(item) => item.target.as_deref().and_then(indirect),
		other => Some(other),
	}
}

/// Mutable [`indirect`].
pub(crate) fn indirect_mut(value: &mut Value) -> Option<&mut Value> {
	match value {
		Value::Ref(item) => item.target.as_deref_mut().and_then(indirect_mut),
		other => Some(other),
	}
}

/// Follow references, allocating a zero target for every null link.
pub(crate) fn indirect_alloc(value: &mut Value) -> &mut Value {
	match value {
		Value::Ref(item) => indirect_alloc(alloc_target(item)),
		other => other,
	}
}

/// Target of `item`, allocating a zero value first when it is null.
pub(crate) fn alloc_target(item: &mut RefValue) -> &mut Value {
	let RefValue { elem, target } = item;
	target.get_or_insert_with(|| Box::new(elem.zero()))
}

/// Wrap `value` in fresh references until it matches the reference depth of `ty`.
pub(crate) fn wrap_in_refs(ty: &Type, value: Value) -> Value {
	match ty {
		Type::Ref(inner) => Value::Ref(RefValue {
			elem: (**inner).clone(),
			target: Some(Box::new(wrap_in_refs(inner, value))),
		}),
		_ => value,
	}
}

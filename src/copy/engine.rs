use std::slice;
use std::sync::Arc;

use crate::copy::convert::convert;
use crate::copy::indirect::{alloc_target, indirect, indirect_mut, wrap_in_refs};
use crate::copy::{CopyError, Result, SeqValue, StructType, StructValue, Type, Value};

/// Runtime limits for a copy.
#[derive(Debug, Clone)]
pub struct CopyOptions {
	/// Number of struct levels mapped, counting the top-level value as the
	/// first; deeper values are skipped. `0` maps nothing at all.
	pub max_depth: u32,
}

impl Default for CopyOptions {
	fn default() -> Self {
		Self { max_depth: 32 }
	}
}

impl CopyOptions {
	/// Map only the top-level value; nested structs are never recursed into.
	pub fn flat() -> Self {
		Self { max_depth: 1 }
	}
}

/// Copy matching fields and accessors from `from` into the value `to` references.
///
/// `to` must be a reference whose chain ends at a live value. A null `from`
/// is a no-op. Fields without a counterpart, incompatible types and failing
/// scanners are skipped rather than reported.
pub fn copy(to: &mut Value, from: &Value) -> Result<()> {
	copy_with(to, from, &CopyOptions::default())
}

/// [`copy`] with explicit options.
pub fn copy_with(to: &mut Value, from: &Value, opt: &CopyOptions) -> Result<()> {
	if !matches!(to, Value::Ref(_)) {
		return Err(CopyError::DestinationUnaddressable);
	}
	Copier { opt }.copy_at(to, from, 0)
}

struct Copier<'a> {
	opt: &'a CopyOptions,
}

impl Copier<'_> {
	fn copy_at(&self, to: &mut Value, from: &Value, depth: u32) -> Result<()> {
		let Some(to) = indirect_mut(to) else {
			return Err(CopyError::DestinationUnaddressable);
		};
		let Some(from) = indirect(from) else {
			return Ok(());
		};
		if depth >= self.opt.max_depth {
			tracing::warn!(max_depth = self.opt.max_depth, from = %from.ty(), "copy depth limit reached, skipping nested value");
			return Ok(());
		}

		let from_ty = from.ty();
		let to_ty = to.ty();
		if !from_ty.base().is_struct() && from_ty.assignable_to(&to_ty) {
			*to = from.clone();
			return Ok(());
		}

		let (Some(_), Some(to_struct)) = (from_ty.base().as_struct(), to_ty.base().as_struct()) else {
			return Ok(());
		};

		match to {
			Value::Seq(seq) => {
				let sources: Vec<Option<&Value>> = match from {
					Value::Seq(items) => items.items.iter().map(indirect).collect(),
					single => vec![Some(single)],
				};
				for source in sources {
					let mut dest = StructValue::zero(to_struct);
					if let Some(Value::Struct(source)) = source {
						self.transfer(&mut dest, source, depth)?;
					}
					append(seq, dest);
				}
			}
			Value::Struct(dest) => {
				if let Value::Struct(source) = from {
					self.transfer(dest, source, depth)?;
				}
			}
			_ => {}
		}
		Ok(())
	}

	fn transfer(&self, dest: &mut StructValue, source: &StructValue, depth: u32) -> Result<()> {
		let dest_ty = Arc::clone(&dest.ty);

		for field in source.ty.flat_fields() {
			let name = field.name.as_ref();
			let Some(value) = source.get(name) else {
				continue;
			};

			let Some(target) = dest_ty.field_by_name(name) else {
				call_setter(dest, &dest_ty, name, value);
				continue;
			};
			if !target.settable {
				continue;
			}
			let Some(slot) = dest.at_path_mut(&target.path) else {
				continue;
			};
			self.assign_field(name, slot, &target.ty, value, depth)?;
		}

		for field in dest_ty.flat_fields() {
			let Some(target) = dest_ty.field_by_name(&field.name) else {
				continue;
			};
			if !target.settable {
				continue;
			}
			let Some(result) = call_accessor(source, &field.name) else {
				continue;
			};
			if let Some(slot) = dest.at_path_mut(&target.path) {
				set(slot, &result);
			}
		}
		Ok(())
	}

	fn assign_field(&self, name: &str, slot: &mut Value, slot_ty: &Type, value: &Value, depth: u32) -> Result<()> {
		if value.ty().innermost().is_nullable() {
			assign_nullable(name, slot, slot_ty, value);
			return Ok(());
		}

		if set(slot, value) {
			return Ok(());
		}
		if slot_ty.base().is_struct() {
			return self.copy_at(slot, value, depth + 1);
		}
		tracing::debug!(field = name, from = %value.ty(), to = %slot_ty, "no conversion, field left unchanged");
		Ok(())
	}
}

/// Unwrap a nullable source, possibly held behind references, into `slot`.
///
/// A null reference chain counts as the absent state.
fn assign_nullable(name: &str, slot: &mut Value, slot_ty: &Type, value: &Value) {
	if value.ty().assignable_to(slot_ty) {
		*slot = value.clone();
		return;
	}
	let present = indirect(value);
	if let Some(present) = present.filter(|item| item.ty().assignable_to(slot_ty.innermost())) {
		*slot = wrap_in_refs(slot_ty, present.clone());
		return;
	}

	match present.and_then(Value::as_nullable).and_then(|item| item.value()) {
		Some(inner) if inner.ty().assignable_to(slot_ty.innermost()) => *slot = wrap_in_refs(slot_ty, inner),
		Some(inner) => {
			tracing::debug!(field = name, from = %inner.ty(), to = %slot_ty, "nullable payload does not fit, field left unchanged");
		}
		None if slot_ty.is_ref() => *slot = slot_ty.zero(),
		None => {}
	}
}

/// Write `from` into `to`, descending and allocating through references on `to`.
///
/// Reports whether the value was taken, either by conversion or by `to`'s
/// scanner.
pub(crate) fn set(to: &mut Value, from: &Value) -> bool {
	if let Value::Ref(item) = to {
		if indirect(from).is_none() {
			item.target = None;
			return true;
		}
		return set(alloc_target(item), from);
	}

	if let Some(converted) = convert(from, &to.ty()) {
		*to = converted;
		return true;
	}

	if let Some(scanner) = to.as_scanner() {
		return match scanner.scan(indirect(from)) {
			Ok(()) => true,
			Err(err) => {
				tracing::debug!(error = %err, from = %from.ty(), "scanner rejected value");
				false
			}
		};
	}

	match from {
		Value::Ref(item) => item.target.as_deref().is_none_or(|inner| set(to, inner)),
		_ => false,
	}
}

fn call_setter(dest: &mut StructValue, dest_ty: &StructType, name: &str, value: &Value) {
	let setter = dest_ty
		.method_by_name(name)
		.filter(|item| item.method.accepts_one(&value.ty()));
	let Some(setter) = setter else {
		tracing::trace!(field = name, dest = dest_ty.name(), "no matching field or setter, dropped");
		return;
	};
	if let Some(receiver) = dest.receiver_mut(&setter.path) {
		setter.method.call(receiver, slice::from_ref(value));
	}
}

fn call_accessor(source: &StructValue, name: &str) -> Option<Value> {
	let accessor = source.ty.method_by_name(name).filter(|item| item.method.is_accessor())?;
	let receiver = source.receiver(&accessor.path)?;
	accessor.method.call_shared(receiver, &[])?.into_iter().next()
}

fn append(seq: &mut SeqValue, dest: StructValue) {
	let dest_ty = Type::Struct(Arc::clone(&dest.ty));
	if Type::reference(dest_ty.clone()).assignable_to(&seq.elem) {
		seq.items.push(Value::reference(Value::Struct(dest)));
	} else if dest_ty.assignable_to(&seq.elem) {
		seq.items.push(Value::Struct(dest));
	} else {
		tracing::trace!(elem = %seq.elem, "sequence element type does not hold the mapped struct, dropped");
	}
}

#[cfg(test)]
mod tests;

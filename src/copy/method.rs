use std::fmt;
use std::sync::Arc;

use crate::copy::{StructValue, Type, Value};

/// Body of a method that only reads its receiver.
pub type MethodFn = Arc<dyn Fn(&StructValue, &[Value]) -> Vec<Value> + Send + Sync>;

/// Body of a method that may mutate its receiver.
pub type MethodMutFn = Arc<dyn Fn(&mut StructValue, &[Value]) -> Vec<Value> + Send + Sync>;

/// How a method borrows its receiver.
#[derive(Clone)]
pub enum Receiver {
	/// Read-only receiver; callable on a copy source.
	Shared(MethodFn),
	/// Mutable receiver; callable only on a destination.
	Exclusive(MethodMutFn),
}

/// Named method attached to a struct type.
#[derive(Clone)]
pub struct Method {
	name: Box<str>,
	params: Vec<Type>,
	results: Vec<Type>,
	receiver: Receiver,
}

impl Method {
	/// Method with a read-only receiver.
	pub fn shared<F>(name: &str, params: Vec<Type>, results: Vec<Type>, f: F) -> Self
	where
		F: Fn(&StructValue, &[Value]) -> Vec<Value> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			params,
			results,
			receiver: Receiver::Shared(Arc::new(f)),
		}
	}

	/// Method with a mutable receiver.
	pub fn exclusive<F>(name: &str, params: Vec<Type>, results: Vec<Type>, f: F) -> Self
	where
		F: Fn(&mut StructValue, &[Value]) -> Vec<Value> + Send + Sync + 'static,
	{
		Self {
			name: name.into(),
			params,
			results,
			receiver: Receiver::Exclusive(Arc::new(f)),
		}
	}

	/// Method name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Declared parameter types.
	pub fn params(&self) -> &[Type] {
		&self.params
	}

	/// Declared result types.
	pub fn results(&self) -> &[Type] {
		&self.results
	}

	/// Whether this is a read-only method taking nothing and returning one value.
	pub fn is_accessor(&self) -> bool {
		self.params.is_empty() && self.results.len() == 1 && matches!(self.receiver, Receiver::Shared(_))
	}

	/// Whether this method takes exactly one argument that `arg` is assignable to.
	pub fn accepts_one(&self, arg: &Type) -> bool {
		matches!(self.params.as_slice(), [param] if arg.assignable_to(param))
	}

	/// Invoke on a read-only receiver. Returns `None` for mutable-receiver methods.
	pub fn call_shared(&self, this: &StructValue, args: &[Value]) -> Option<Vec<Value>> {
		match &self.receiver {
			Receiver::Shared(body) => Some(body(this, args)),
			Receiver::Exclusive(_) => None,
		}
	}

	/// Invoke on a mutable receiver.
	pub fn call(&self, this: &mut StructValue, args: &[Value]) -> Vec<Value> {
		match &self.receiver {
			Receiver::Shared(body) => body(this, args),
			Receiver::Exclusive(body) => body(this, args),
		}
	}
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method")
			.field("name", &self.name)
			.field("params", &self.params)
			.field("results", &self.results)
			.finish_non_exhaustive()
	}
}

/// Method reachable from a struct type, possibly promoted from an embedded struct.
#[derive(Debug, Clone)]
pub struct FlatMethod {
	/// Field indices leading to the embedded receiver; empty for own methods.
	pub path: Vec<usize>,
	/// The method itself.
	pub method: Method,
}

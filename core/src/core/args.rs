// valpipe/src/core/args.rs

//! The assembled argument list handed to a step callable.

use crate::error::{PipeError, PipeResult};

/// Arguments for a single step invocation.
///
/// Holds the step's extra arguments with the threaded value spliced in at
/// `data_index`. For by-reference steps the engine reads the threaded slot back
/// after the call, so writes through [`Args::data_mut`] propagate forward. For
/// by-value steps the slot is a copy and writes are discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct Args<V> {
  values: Vec<V>,
  data_index: usize,
}

impl<V> Args<V> {
  /// Splices `data` into `extras` at `position`, clamped to `extras.len()`.
  pub(crate) fn assemble(extras: &[V], data: V, position: usize) -> Self
  where
    V: Clone,
  {
    let data_index = position.min(extras.len());
    let mut values = Vec::with_capacity(extras.len() + 1);
    values.extend_from_slice(&extras[..data_index]);
    values.push(data);
    values.extend_from_slice(&extras[data_index..]);
    Self { values, data_index }
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Never true for an assembled list, which always carries the threaded value.
  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  /// Index of the threaded value in the argument list.
  pub fn data_index(&self) -> usize {
    self.data_index
  }

  pub fn data(&self) -> &V {
    &self.values[self.data_index]
  }

  /// Mutable handle to the threaded value.
  pub fn data_mut(&mut self) -> &mut V {
    &mut self.values[self.data_index]
  }

  /// Positional access that reports arity mismatches as [`PipeError::MissingArgument`].
  pub fn get(&self, index: usize) -> PipeResult<&V> {
    self.values.get(index).ok_or(PipeError::MissingArgument {
      index,
      arity: self.values.len(),
    })
  }

  pub fn get_mut(&mut self, index: usize) -> PipeResult<&mut V> {
    let arity = self.values.len();
    self
      .values
      .get_mut(index)
      .ok_or(PipeError::MissingArgument { index, arity })
  }

  pub fn iter(&self) -> std::slice::Iter<'_, V> {
    self.values.iter()
  }

  /// The caller-supplied arguments in their original order, without the threaded value.
  pub fn extras(&self) -> impl Iterator<Item = &V> + '_ {
    self
      .values
      .iter()
      .enumerate()
      .filter(move |(idx, _)| *idx != self.data_index)
      .map(|(_, value)| value)
  }

  pub fn as_slice(&self) -> &[V] {
    &self.values
  }

  pub(crate) fn into_data(mut self) -> V {
    self.values.swap_remove(self.data_index)
  }
}

impl<'a, V> IntoIterator for &'a Args<V> {
  type Item = &'a V;
  type IntoIter = std::slice::Iter<'a, V>;

  fn into_iter(self) -> Self::IntoIter {
    self.values.iter()
  }
}

// core/src/core/context.rs

//! The shared context wrapper handed to every workflow handler, and the
//! handler type itself.

use crate::core::control::StageControl;
use parking_lot::{
  MappedRwLockReadGuard, MappedRwLockWriteGuard, RwLock, RwLockReadGuard, RwLockWriteGuard,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Shared, lockable workflow state.
///
/// Cloning a `SharedContext` is cheap: clones share the same underlying
/// value, so a handler's writes are visible to every later handler and to
/// the caller that kicked off the run.
///
/// IMPORTANT: lock guards obtained from this struct are blocking and MUST
/// NOT be held across an `.await` suspension point.
#[derive(Debug)]
pub struct SharedContext<T: Send + Sync + 'static>(Arc<RwLock<T>>);

impl<T: Send + Sync + 'static> SharedContext<T> {
  pub fn new(data: T) -> Self {
    SharedContext(Arc::new(RwLock::new(data)))
  }

  /// Acquires a read lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn read(&self) -> RwLockReadGuard<'_, T> {
    self.0.read()
  }

  /// Acquires a write lock. The returned guard MUST be dropped before any
  /// `.await` point.
  pub fn write(&self) -> RwLockWriteGuard<'_, T> {
    self.0.write()
  }

  /// Attempts to acquire a read lock without blocking.
  pub fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
    self.0.try_read()
  }

  /// Attempts to acquire a write lock without blocking.
  pub fn try_write(&self) -> Option<RwLockWriteGuard<'_, T>> {
    self.0.try_write()
  }

  /// Read guard narrowed to one field of the context.
  pub fn map_read<F, U: ?Sized>(&self, f: F) -> MappedRwLockReadGuard<'_, U>
  where
    F: FnOnce(&T) -> &U,
  {
    RwLockReadGuard::map(self.read(), f)
  }

  /// Write guard narrowed to one field of the context.
  pub fn map_write<F, U: ?Sized>(&self, f: F) -> MappedRwLockWriteGuard<'_, U>
  where
    F: FnOnce(&mut T) -> &mut U,
  {
    RwLockWriteGuard::map(self.write(), f)
  }
}

impl<T: Send + Sync + 'static> Clone for SharedContext<T> {
  fn clone(&self) -> Self {
    SharedContext(Arc::clone(&self.0))
  }
}

impl<T: Send + Sync + 'static + Default> Default for SharedContext<T> {
  fn default() -> Self {
    Self::new(Default::default())
  }
}

/// A stage handler: an async function over the shared context, resolving to
/// either a control signal or the workflow's error type.
///
/// Handlers are responsible for:
/// 1. Acquiring `.read()`/`.write()` locks on the context as needed.
/// 2. Ensuring lock guards are dropped BEFORE any `.await` suspension point.
/// 3. Returning [`StageControl::Continue`] to proceed or
///    [`StageControl::Halt`] to end the run early.
pub type Handler<TData, Err> = Box<
  dyn Fn(SharedContext<TData>) -> Pin<Box<dyn Future<Output = Result<StageControl, Err>> + Send>>
    + Send
    + Sync,
>;

use std::fmt::Display;
use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[track_caller]
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(err) => {
            log_poisoned("mutex", &err);
            err.into_inner()
        }
    }
}

#[track_caller]
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    match lock.read() {
        Ok(guard) => guard,
        Err(err) => {
            log_poisoned("rwlock", &err);
            err.into_inner()
        }
    }
}

#[track_caller]
pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    match lock.write() {
        Ok(guard) => guard,
        Err(err) => {
            log_poisoned("rwlock", &err);
            err.into_inner()
        }
    }
}

#[track_caller]
fn log_poisoned(kind: &'static str, err: &dyn Display) {
    let loc = std::panic::Location::caller();
    tracing::error!(
        target: "nova.decompile",
        file = loc.file(),
        line = loc.line(),
        column = loc.column(),
        error = %err,
        "{kind} poisoned; continuing with recovered guard"
    );
}

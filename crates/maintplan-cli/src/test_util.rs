//! Helpers for tests that touch process-wide environment variables.

use std::sync::{Mutex, MutexGuard};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Serialize tests that read or write env vars.
pub fn lock_env() -> MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Sets and removes env vars, restoring the previous values on drop.
///
/// Hold [`lock_env`] for as long as the guard lives.
#[derive(Default)]
pub struct EnvGuard {
    saved: Vec<(String, Option<String>)>,
}

impl EnvGuard {
    pub fn set(&mut self, name: &str, value: &str) {
        self.save(name);
        unsafe { std::env::set_var(name, value) };
    }

    pub fn remove(&mut self, name: &str) {
        self.save(name);
        unsafe { std::env::remove_var(name) };
    }

    fn save(&mut self, name: &str) {
        if !self.saved.iter().any(|(n, _)| n == name) {
            self.saved.push((name.to_string(), std::env::var(name).ok()));
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (name, value) in self.saved.drain(..).rev() {
            match value {
                Some(v) => unsafe { std::env::set_var(&name, v) },
                None => unsafe { std::env::remove_var(&name) },
            }
        }
    }
}

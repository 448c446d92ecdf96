use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;

pub type RotationCallback = Box<dyn Fn() + Send + Sync>;

/// Ordered registry of zero-argument callbacks fired after each rotation.
#[derive(Default)]
pub struct RotationCallbacks {
    callbacks: Mutex<Vec<RotationCallback>>,
}

impl RotationCallbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F: Fn() + Send + Sync + 'static>(&self, callback: F) {
        self.callbacks.lock().unwrap().push(Box::new(callback));
    }

    /// Invoke every callback in registration order. A panicking callback
    /// does not stop the ones after it.
    pub fn fire_all(&self) {
        let callbacks = self.callbacks.lock().unwrap();
        for (index, callback) in callbacks.iter().enumerate() {
            if catch_unwind(AssertUnwindSafe(|| callback())).is_err() {
                eprintln!("rotation callback {index} panicked");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

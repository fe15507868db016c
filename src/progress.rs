//! Progress reporting seam between the engines and their caller.

/// Observer notified after each file in a batch has been processed,
/// whether the move succeeded or failed.
///
/// `current` is 1-based and `total` is fixed for the whole batch. The
/// callback runs synchronously on the engine's thread between file
/// operations, so implementations must not mutate the folder being
/// organized.
pub trait Progress {
    fn on_file(&mut self, current: usize, total: usize, file_name: &str);
}

/// Any `FnMut(current, total, file_name)` closure is a progress sink.
impl<F: FnMut(usize, usize, &str)> Progress for F {
    fn on_file(&mut self, current: usize, total: usize, file_name: &str) {
        self(current, total, file_name)
    }
}

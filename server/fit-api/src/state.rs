use fit_engine::Engine;

pub const DEFAULT_MAX_BATCH: usize = 500;

pub struct AppState {
  pub engine: Engine,
  /// Largest accepted `/evaluate/batch` payload, in requests.
  pub max_batch: usize,
}

impl AppState {
  pub fn new(engine: Engine) -> Self {
    Self {
      engine,
      max_batch: DEFAULT_MAX_BATCH,
    }
  }
}

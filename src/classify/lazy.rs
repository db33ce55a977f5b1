// src/classify/lazy.rs
use anyhow::Result;
use tokio::sync::OnceCell;
use tracing::info;

use crate::classify::model::DynModel;

type Factory = Box<dyn Fn() -> Result<DynModel> + Send + Sync>;

/// Model handle built on first use and reused for the life of the process.
///
/// Concurrent first callers wait on the same initialization. A failed build is not
/// stored, so the next call tries again.
pub struct LazyModel {
    cell: OnceCell<DynModel>,
    factory: Factory,
}

impl LazyModel {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> Result<DynModel> + Send + Sync + 'static,
    {
        Self {
            cell: OnceCell::new(),
            factory: Box::new(factory),
        }
    }

    /// Already-initialized handle.
    pub fn ready(model: DynModel) -> Self {
        let again = model.clone();
        Self {
            cell: OnceCell::new_with(Some(model)),
            factory: Box::new(move || Ok(again.clone())),
        }
    }

    pub async fn get(&self) -> Result<&DynModel> {
        self.cell
            .get_or_try_init(|| async {
                let model = (self.factory)()?;
                info!(model = model.name(), "initialized zero-shot model");
                Ok::<_, anyhow::Error>(model)
            })
            .await
    }

    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

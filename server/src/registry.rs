//! Process-wide task registry: populated once at startup from the config,
//! passed explicitly to whoever needs it, no hidden mutation paths.

use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, MutexGuard};

use crate::config::ConfigErr;
use crate::error::UpdateErr;
use crate::task::FlTask;

/// One task's mutable state behind an async lock.
///
/// The lock is the per-task serialization point: an aggregation holds it
/// across storage I/O, so concurrent submissions for the same task queue
/// in lock-acquisition order while other tasks proceed in parallel.
#[derive(Debug)]
pub struct TaskSlot {
    state: Mutex<FlTask>,
}

impl TaskSlot {
    fn new(task: FlTask) -> Self {
        Self {
            state: Mutex::new(task),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, FlTask> {
        self.state.lock().await
    }
}

#[derive(Debug)]
pub struct TaskRegistry {
    tasks: HashMap<String, Arc<TaskSlot>>,
}

impl TaskRegistry {
    /// Builds the registry from the configured tasks.
    ///
    /// # Errors
    /// Returns `ConfigErr::Invalid` on a duplicate task id.
    pub fn new(tasks: Vec<FlTask>) -> Result<Self, ConfigErr> {
        let mut map = HashMap::with_capacity(tasks.len());
        for task in tasks {
            let id = task.id.clone();
            if map.insert(id.clone(), Arc::new(TaskSlot::new(task))).is_some() {
                return Err(ConfigErr::Invalid {
                    detail: format!("duplicate task id '{id}'"),
                });
            }
        }
        Ok(Self { tasks: map })
    }

    /// Looks a task slot up by id.
    ///
    /// # Errors
    /// `UpdateErr::TaskNotFound` for an unknown id.
    pub fn get(&self, id: &str) -> Result<Arc<TaskSlot>, UpdateErr> {
        self.tasks
            .get(id)
            .cloned()
            .ok_or_else(|| UpdateErr::TaskNotFound { id: id.to_string() })
    }

    pub fn slots(&self) -> impl Iterator<Item = &Arc<TaskSlot>> {
        self.tasks.values()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

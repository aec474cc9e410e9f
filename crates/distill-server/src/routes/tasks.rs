//! Task catalogue endpoint.

use axum::{extract::State, Json};
use distill_core::{Marker, Rendering, Task};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct TaskInfo {
    pub task: Task,
    pub title: &'static str,
    pub max_tokens: u32,
    pub accepts_text: bool,
    pub accepts_upload: bool,
    pub requires_upload: bool,
    pub requires_job_description: bool,
    pub uses_max_marks: bool,
    pub rendering: Rendering,
    pub markers: &'static [Marker],
}

#[derive(Debug, Serialize)]
pub struct TasksResponse {
    pub tasks: Vec<TaskInfo>,
    pub max_upload_bytes: usize,
}

/// List the available tasks with their effective budgets.
/// GET /tasks
pub async fn list_tasks(State(state): State<AppState>) -> Json<TasksResponse> {
    let budgets = state.analyzer.budgets();
    let tasks = Task::all()
        .iter()
        .map(|&task| TaskInfo {
            task,
            title: task.title(),
            max_tokens: budgets.for_task(task),
            accepts_text: task.accepts_text(),
            accepts_upload: task.accepts_upload(),
            requires_upload: task.requires_upload(),
            requires_job_description: task.requires_job_description(),
            uses_max_marks: task.uses_max_marks(),
            rendering: task.rendering(),
            markers: task.markers(),
        })
        .collect();

    Json(TasksResponse {
        tasks,
        max_upload_bytes: state.config.max_upload_bytes,
    })
}

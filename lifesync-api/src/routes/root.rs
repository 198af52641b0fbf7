/// Service metadata at `GET /`

use axum::Json;
use serde_json::{json, Value};

pub async fn index() -> Json<Value> {
    Json(json!({
        "name": "LifeSync API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Backend API for LifeSync Family Management App",
        "status": "running",
        "endpoints": {
            "health": "/api/health",
            "auth": "/api/auth",
            "expenses": "/api/expenses",
            "incomes": "/api/incomes",
            "tasks": "/api/tasks",
            "budgets": "/api/budgets",
            "savings": "/api/savings",
            "reminders": "/api/reminders",
            "healthRecords": "/api/health-records",
            "familyMembers": "/api/family-members",
            "familyNumbers": "/api/family-numbers"
        }
    }))
}

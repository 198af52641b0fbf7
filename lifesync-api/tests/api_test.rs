/// Database-backed API tests
///
/// Run with `DATABASE_URL` pointing at a scratch database. Each test seeds
/// its own owner and removes it (and everything it owns) at the end.

mod common;

use axum::http::{Method, StatusCode};
use chrono::{Datelike, Duration, Utc};
use common::{send, TestContext, TEST_PASSWORD, TEST_SECRET};
use lifesync_shared::auth::jwt;
use lifesync_shared::models::user::User;
use serde_json::json;
use uuid::Uuid;

macro_rules! context {
    () => {
        match TestContext::try_new().await {
            Some(ctx) => ctx,
            None => return,
        }
    };
}

#[tokio::test]
async fn test_register_login_and_profile() {
    let ctx = context!();
    let email = common::unique_email("Alex");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Alex", "email": format!("  {}  ", email.to_uppercase()), "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["email"], email.to_lowercase());
    assert_eq!(body["user"]["role"], "owner");
    assert!(body["user"].get("passwordHash").is_none());
    let user_id: Uuid = body["user"]["id"].as_str().unwrap().parse().unwrap();

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "name": "Alex again", "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid email or password");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["user"]["lastLogin"].is_string());
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = ctx
        .send_as(&token, Method::PUT, "/api/auth/me", Some(json!({ "phone": "555-0100" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["phone"], "555-0100");
    assert_eq!(body["name"], "Alex");

    let (status, body) = ctx
        .send_as(
            &token,
            Method::PUT,
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "nope-nope", "newPassword": "secret2" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Current password is incorrect");

    let (status, _) = ctx
        .send_as(
            &token,
            Method::PUT,
            "/api/auth/change-password",
            Some(json!({ "currentPassword": "secret1", "newPassword": "secret2" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": email, "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    User::delete(&ctx.db, user_id).await.unwrap();
    ctx.cleanup().await;
}

#[tokio::test]
async fn test_deactivated_user_is_rejected() {
    let ctx = context!();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/family-members",
            Some(json!({ "name": "Kid", "email": common::unique_email("kid"), "password": "kidpass" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let member_id = body["familyMember"]["id"].as_str().unwrap().to_string();
    let member_email = body["familyMember"]["email"].as_str().unwrap().to_string();
    let member_token = jwt::issue_for_user(member_id.parse().unwrap(), TEST_SECRET, 30).unwrap();

    let (status, _) = ctx
        .send(
            Method::PUT,
            &format!("/api/auth/family-members/{}", member_id),
            Some(json!({ "isActive": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = ctx.send_as(&member_token, Method::GET, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "User not found or inactive");

    let (status, body) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": member_email, "password": "kidpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Account is inactive");

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_member_accounts_share_the_family_scope() {
    let ctx = context!();

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/auth/family-members",
            Some(json!({
                "name": "Sam",
                "email": common::unique_email("sam"),
                "password": TEST_PASSWORD,
                "relation": "Spouse"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Family member account created successfully");
    assert_eq!(body["familyMember"]["role"], "member");
    assert_eq!(body["familyMember"]["familyId"], ctx.owner.id.to_string());
    assert_eq!(body["familyMember"]["parentUserId"], ctx.owner.id.to_string());
    let member_id: Uuid = body["familyMember"]["id"].as_str().unwrap().parse().unwrap();
    let member_token = jwt::issue_for_user(member_id, TEST_SECRET, 30).unwrap();

    // Data created by the member is visible to the owner and vice versa
    let (status, _) = ctx
        .send_as(
            &member_token,
            Method::POST,
            "/api/expenses",
            Some(json!({ "description": "Groceries", "amount": 42.5, "category": "Food" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, expenses) = ctx.send(Method::GET, "/api/expenses", None).await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);
    assert_eq!(expenses[0]["createdBy"], member_id.to_string());
    assert_eq!(expenses[0]["familyId"], ctx.owner.id.to_string());

    // Owners see the member and members see the owner
    let (_, accounts) = ctx.send(Method::GET, "/api/auth/family-members", None).await;
    assert_eq!(accounts.as_array().unwrap().len(), 1);
    let (_, accounts) = ctx
        .send_as(&member_token, Method::GET, "/api/auth/family-members", None)
        .await;
    assert_eq!(accounts[0]["id"], ctx.owner.id.to_string());

    // Members cannot provision accounts or delete the owner
    let (status, _) = ctx
        .send_as(
            &member_token,
            Method::POST,
            "/api/auth/family-members",
            Some(json!({ "name": "X", "email": common::unique_email("x"), "password": "xxxxxx" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send_as(
            &member_token,
            Method::DELETE,
            &format!("/api/auth/family-members/{}", ctx.owner.id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot delete family owner account");

    // Another family cannot touch the member
    let (other, other_token) = ctx.other_family().await;
    let (status, _) = ctx
        .send_as(
            &other_token,
            Method::PUT,
            &format!("/api/auth/family-members/{}/reset-password", member_id),
            Some(json!({ "newPassword": "hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = ctx
        .send(Method::DELETE, &format!("/api/auth/family-members/{}", member_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Family member deleted successfully");

    User::delete(&ctx.db, other.id).await.unwrap();
    ctx.cleanup().await;
}

#[tokio::test]
async fn test_members_cannot_take_over_the_owner() {
    let ctx = context!();

    let (_, body) = ctx
        .send(
            Method::POST,
            "/api/auth/family-members",
            Some(json!({ "name": "Teen", "email": common::unique_email("teen"), "password": TEST_PASSWORD })),
        )
        .await;
    let member_id: Uuid = body["familyMember"]["id"].as_str().unwrap().parse().unwrap();
    let member_token = jwt::issue_for_user(member_id, TEST_SECRET, 30).unwrap();
    let (_, body) = ctx
        .send(
            Method::POST,
            "/api/auth/family-members",
            Some(json!({ "name": "Sibling", "email": common::unique_email("sib"), "password": TEST_PASSWORD })),
        )
        .await;
    let sibling_id = body["familyMember"]["id"].as_str().unwrap().to_string();
    let owner_uri = format!("/api/auth/family-members/{}", ctx.owner.id);

    let (status, body) = ctx
        .send_as(
            &member_token,
            Method::PUT,
            &format!("{}/reset-password", owner_uri),
            Some(json!({ "newPassword": "taken-over" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Cannot modify family owner account");

    let (status, _) = ctx
        .send_as(&member_token, Method::PUT, &owner_uri, Some(json!({ "isActive": false })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = ctx
        .send_as(
            &member_token,
            Method::PUT,
            &format!("/api/auth/family-members/{}/reset-password", sibling_id),
            Some(json!({ "newPassword": "sibling-pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner is untouched and can still log in
    let (status, _) = send(
        &ctx.app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ctx.owner.email, "password": TEST_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Members may still change their own account
    let (status, _) = ctx
        .send_as(
            &member_token,
            Method::PUT,
            &format!("/api/auth/family-members/{}", member_id),
            Some(json!({ "phone": "555-0142" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_records_are_invisible_to_other_families() {
    let ctx = context!();
    let (other, other_token) = ctx.other_family().await;

    let (status, expense) = ctx
        .send(
            Method::POST,
            "/api/expenses",
            Some(json!({ "description": "Rent", "amount": 1200, "category": "Housing" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["paymentMethod"], "Cash");
    let uri = format!("/api/expenses/{}", expense["id"].as_str().unwrap());

    let (status, body) = ctx.send_as(&other_token, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Expense not found");

    let (status, _) = ctx
        .send_as(&other_token, Method::PUT, &uri, Some(json!({ "amount": 1 })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = ctx.send_as(&other_token, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = ctx.send_as(&other_token, Method::GET, "/api/expenses", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, body) = ctx.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Expense deleted successfully");

    User::delete(&ctx.db, other.id).await.unwrap();
    ctx.cleanup().await;
}

#[tokio::test]
async fn test_expense_filters_and_member_names() {
    let ctx = context!();
    let (other, other_token) = ctx.other_family().await;

    let (_, member) = ctx
        .send(Method::POST, "/api/family-members", Some(json!({ "name": "Jordan" })))
        .await;
    let (_, foreign_member) = ctx
        .send_as(&other_token, Method::POST, "/api/family-members", Some(json!({ "name": "Stranger" })))
        .await;

    for (description, date, member_id) in [
        ("Bus", "2025-03-01", member["id"].clone()),
        ("Lunch", "2025-03-31T18:00:00Z", foreign_member["id"].clone()),
        ("Train", "2025-04-01", serde_json::Value::Null),
    ] {
        let (status, _) = ctx
            .send(
                Method::POST,
                "/api/expenses",
                Some(json!({
                    "description": description,
                    "amount": 10,
                    "category": "Transport",
                    "date": date,
                    "familyMemberId": member_id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = ctx
        .send(Method::GET, "/api/expenses?startDate=2025-03-01&endDate=2025-03-31", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["description"], "Lunch");
    assert!(list[0]["familyMemberName"].is_null());
    assert_eq!(list[1]["familyMemberName"], "Jordan");

    let (_, limited) = ctx.send(Method::GET, "/api/expenses?limit=1", None).await;
    assert_eq!(limited[0]["description"], "Train");

    let (status, _) = ctx.send(Method::GET, "/api/expenses?startDate=yesterday", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = ctx
        .send(
            Method::POST,
            "/api/expenses",
            Some(json!({
                "description": "Ghost",
                "amount": 1,
                "category": "Transport",
                "familyMemberId": Uuid::new_v4()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Referenced record does not exist");

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/tasks",
            Some(json!({ "title": "Nobody's job", "assignedTo": Uuid::new_v4() })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    User::delete(&ctx.db, other.id).await.unwrap();
    ctx.cleanup().await;
}

#[tokio::test]
async fn test_monthly_summaries_cover_the_whole_month() {
    let ctx = context!();

    for (amount, category, date) in [
        (30.0, "Food", "2025-01-01T00:00:00Z"),
        (20.0, "Food", "2025-01-31T23:30:00Z"),
        (50.0, "Fuel", "2025-01-15"),
        (99.0, "Food", "2025-02-01T00:00:00Z"),
    ] {
        ctx.send(
            Method::POST,
            "/api/expenses",
            Some(json!({ "description": "x", "amount": amount, "category": category, "date": date })),
        )
        .await;
    }

    let (status, summary) = ctx
        .send(Method::GET, "/api/expenses/summary/monthly?month=1&year=2025", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalAmount"], 100.0);

    let food = summary["expenses"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["category"] == "Food")
        .unwrap();
    assert_eq!(food["total"], 50.0);
    assert_eq!(food["count"], 2);

    ctx.send(
        Method::POST,
        "/api/incomes",
        Some(json!({ "description": "Salary", "amount": 3000, "source": "Job", "date": "2025-01-25" })),
    )
    .await;
    let (_, incomes) = ctx
        .send(Method::GET, "/api/incomes/summary/monthly?month=1&year=2025", None)
        .await;
    assert_eq!(incomes["totalAmount"], 3000.0);
    assert_eq!(incomes["incomes"][0]["source"], "Job");

    let (status, body) = ctx
        .send(Method::GET, "/api/expenses/summary/monthly?month=13&year=2025", None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("month must be between 1 and 12"));

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_budget_spending() {
    let ctx = context!();
    let now = Utc::now();

    let (status, budget) = ctx
        .send(
            Method::POST,
            "/api/budgets",
            Some(json!({
                "category": "Food",
                "allocatedAmount": 200,
                "month": now.month(),
                "year": now.year()
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(budget["alertThreshold"], 80);
    assert_eq!(budget["usagePercent"], 0.0);
    let spend_uri = format!("/api/budgets/{}/spend", budget["id"].as_str().unwrap());

    let (_, budget) = ctx.send(Method::PATCH, &spend_uri, Some(json!({ "amount": 170 }))).await;
    assert_eq!(budget["spentAmount"], 170.0);
    assert_eq!(budget["usagePercent"], 85.0);
    assert_eq!(budget["isAlerting"], true);

    let (status, _) = ctx.send(Method::PATCH, &spend_uri, Some(json!({ "amount": -500 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, over) = ctx.send(Method::GET, "/api/budgets/over-budget", None).await;
    assert!(over.as_array().unwrap().is_empty());

    ctx.send(Method::PATCH, &spend_uri, Some(json!({ "amount": 30 }))).await;
    let (_, over) = ctx.send(Method::GET, "/api/budgets/over-budget", None).await;
    assert_eq!(over.as_array().unwrap().len(), 1);

    let (_, current) = ctx.send(Method::GET, "/api/budgets/current", None).await;
    assert_eq!(current.as_array().unwrap().len(), 1);

    let (status, _) = ctx
        .send(
            Method::PATCH,
            &format!("/api/budgets/{}/spend", Uuid::new_v4()),
            Some(json!({ "amount": 1 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_savings_contributions_and_summary() {
    let ctx = context!();

    let (_, goal) = ctx
        .send(Method::POST, "/api/savings", Some(json!({ "name": "Bike", "targetAmount": 400 })))
        .await;
    ctx.send(
        Method::POST,
        "/api/savings",
        Some(json!({ "name": "Trip", "targetAmount": 600, "currentAmount": 100 })),
    )
    .await;
    let uri = format!("/api/savings/{}/contribute", goal["id"].as_str().unwrap());

    let (_, summary) = ctx.send(Method::GET, "/api/savings/summary", None).await;
    assert_eq!(summary["activeGoals"], 2);
    assert_eq!(summary["overallProgress"], 10.0);

    let (_, goal) = ctx.send(Method::PATCH, &uri, Some(json!({ "amount": 150 }))).await;
    assert_eq!(goal["progress"], 37.5);
    assert_eq!(goal["isCompleted"], false);

    let (_, goal) = ctx.send(Method::PATCH, &uri, Some(json!({ "amount": 300 }))).await;
    assert_eq!(goal["currentAmount"], 450.0);
    assert_eq!(goal["progress"], 100.0);
    assert_eq!(goal["isCompleted"], true);

    let (_, summary) = ctx.send(Method::GET, "/api/savings/summary", None).await;
    assert_eq!(summary["activeGoals"], 1);

    let (status, _) = ctx.send(Method::PATCH, &uri, Some(json!({ "amount": -1000 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_task_views() {
    let ctx = context!();
    let now = Utc::now();

    let (_, assignee) = ctx
        .send(Method::POST, "/api/family-members", Some(json!({ "name": "Riley" })))
        .await;

    for (title, due, priority) in [
        ("Low today", now, "Low"),
        ("High today", now, "High"),
        ("Late", now - Duration::days(3), "Medium"),
    ] {
        ctx.send(
            Method::POST,
            "/api/tasks",
            Some(json!({
                "title": title,
                "dueDate": due.to_rfc3339(),
                "priority": priority,
                "assignedTo": assignee["id"]
            })),
        )
        .await;
    }

    let (_, today) = ctx.send(Method::GET, "/api/tasks/today", None).await;
    let today = today.as_array().unwrap();
    assert_eq!(today.len(), 2);
    assert_eq!(today[0]["title"], "High today");
    assert_eq!(today[0]["assignedToName"], "Riley");

    let (_, overdue) = ctx.send(Method::GET, "/api/tasks/overdue", None).await;
    assert_eq!(overdue.as_array().unwrap().len(), 1);
    let late_id = overdue[0]["id"].as_str().unwrap().to_string();

    let (_, done) = ctx
        .send(Method::PATCH, &format!("/api/tasks/{}/complete", late_id), None)
        .await;
    assert_eq!(done["isCompleted"], true);
    assert_eq!(done["status"], "Completed");
    assert!(done["completedAt"].is_string());

    let (_, overdue) = ctx.send(Method::GET, "/api/tasks/overdue", None).await;
    assert!(overdue.as_array().unwrap().is_empty());

    let (_, completed) = ctx.send(Method::GET, "/api/tasks?isCompleted=true", None).await;
    assert_eq!(completed.as_array().unwrap().len(), 1);

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_reminders_and_health_records() {
    let ctx = context!();
    let now = Utc::now();

    let (status, reminder) = ctx
        .send(
            Method::POST,
            "/api/reminders",
            Some(json!({ "title": "Power bill", "dueDate": (now - Duration::days(1)).to_rfc3339(), "amount": 80 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(reminder["type"], "Bill");

    let (status, _) = ctx
        .send(Method::POST, "/api/reminders", Some(json!({ "title": "No date" })))
        .await;
    assert!(status.is_client_error());

    let (_, overdue) = ctx.send(Method::GET, "/api/reminders/overdue", None).await;
    assert_eq!(overdue.as_array().unwrap().len(), 1);

    let (_, paid) = ctx
        .send(
            Method::PATCH,
            &format!("/api/reminders/{}/pay", reminder["id"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(paid["isPaid"], true);
    assert!(paid["paidDate"].is_string());

    let (_, pending) = ctx.send(Method::GET, "/api/reminders/pending", None).await;
    assert!(pending.as_array().unwrap().is_empty());

    ctx.send(
        Method::POST,
        "/api/health-records",
        Some(json!({ "memberName": "Grandma", "nextVisit": (now + Duration::days(7)).to_rfc3339() })),
    )
    .await;
    ctx.send(
        Method::POST,
        "/api/health-records",
        Some(json!({ "memberName": "Dad", "recordType": "Dental" })),
    )
    .await;

    let (_, upcoming) = ctx.send(Method::GET, "/api/health-records/upcoming-visits", None).await;
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    assert_eq!(upcoming[0]["recordType"], "Checkup");

    let (_, dad) = ctx.send(Method::GET, "/api/health-records/member/Dad", None).await;
    assert_eq!(dad.as_array().unwrap().len(), 1);
    assert_eq!(dad[0]["recordType"], "Dental");

    ctx.cleanup().await;
}

#[tokio::test]
async fn test_family_numbers_bulk_is_all_or_nothing() {
    let ctx = context!();

    let (status, _) = ctx
        .send(
            Method::POST,
            "/api/family-numbers/bulk",
            Some(json!([
                { "name": "Dad", "phone": "555-0100" },
                { "name": "Broken", "phone": "" }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = ctx.send(Method::GET, "/api/family-numbers", None).await;
    assert!(list.as_array().unwrap().is_empty());

    let (status, created) = ctx
        .send(
            Method::POST,
            "/api/family-numbers/bulk",
            Some(json!([
                { "name": "Zed", "phone": "555-0101" },
                { "name": "Mum", "phone": "555-0102", "isPrimary": true },
                { "name": "Clinic", "phone": "555-0199", "category": "Medical", "isEmergency": true }
            ])),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 3);

    let (_, list) = ctx.send(Method::GET, "/api/family-numbers", None).await;
    let names: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Mum", "Clinic", "Zed"]);

    let (_, emergency) = ctx.send(Method::GET, "/api/family-numbers/emergency", None).await;
    assert_eq!(emergency[0]["name"], "Clinic");

    let (_, medical) = ctx.send(Method::GET, "/api/family-numbers/category/Medical", None).await;
    assert_eq!(medical.as_array().unwrap().len(), 1);

    let (_, flagged) = ctx.send(Method::GET, "/api/family-numbers?isEmergency=yes", None).await;
    assert_eq!(flagged.as_array().unwrap().len(), 2);

    ctx.cleanup().await;
}

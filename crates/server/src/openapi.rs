//! OpenAPI description served at `/api-docs/openapi.json`. The request schemas below mirror
//! the service inputs; enum-valued fields are documented as their snake_case strings.

use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct CreateUserDoc {
    pub email: String,
    pub name: String,
    /// admin | supervisor | technician | viewer
    pub role: String,
    pub phone: Option<String>,
    /// At least 8 characters.
    pub password: String,
}

#[derive(ToSchema)]
pub struct UpdateUserDoc {
    pub name: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct ChangePasswordDoc { pub current_password: String, pub new_password: String }

#[derive(ToSchema)]
pub struct CreateEquipmentDoc {
    pub inventory_code: String,
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub category: String,
    pub location: String,
    /// i | iia | iib | iii
    pub risk_class: String,
    pub status: Option<String>,
    /// YYYY-MM-DD
    pub acquisition_date: Option<String>,
    pub warranty_expires_on: Option<String>,
    pub responsible_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateEquipmentDoc {
    pub inventory_code: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    /// operational | under_maintenance | out_of_service | decommissioned
    pub status: Option<String>,
    pub responsible_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(ToSchema)]
pub struct CreateWorkOrderDoc {
    pub equipment_id: Uuid,
    pub maintenance_plan_id: Option<Uuid>,
    /// preventive | corrective | inspection | calibration
    pub kind: String,
    /// low | medium | high | critical
    pub priority: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub reported_by: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub scheduled_for: Option<String>,
}

#[derive(ToSchema)]
pub struct UpdateWorkOrderDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub scheduled_for: Option<String>,
    pub labor_hours: Option<f64>,
    pub cost_cents: Option<i64>,
}

#[derive(ToSchema)]
pub struct AssignDoc { pub user_id: Uuid }

#[derive(ToSchema)]
pub struct StatusChangeDoc {
    /// open | assigned | in_progress | on_hold | completed | cancelled
    pub status: String,
    pub resolution: Option<String>,
}

#[derive(ToSchema)]
pub struct CreatePlanDoc {
    pub equipment_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// daily | weekly | biweekly | monthly | quarterly | semiannual | annual
    pub frequency: String,
    pub lead_days: Option<i32>,
    /// Defaults to today plus one period.
    pub next_due_on: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct UpdatePlanDoc {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub lead_days: Option<i32>,
    pub next_due_on: Option<String>,
    pub assigned_to: Option<Uuid>,
    pub active: Option<bool>,
}

#[derive(ToSchema)]
pub struct CreateDocumentDoc {
    /// At least one of equipment_id and work_order_id.
    pub equipment_id: Option<Uuid>,
    pub work_order_id: Option<Uuid>,
    pub title: String,
    /// manual | certificate | calibration_report | invoice | other
    pub kind: Option<String>,
    pub url: String,
    pub mime_type: Option<String>,
    pub uploaded_by: Option<Uuid>,
}

#[derive(ToSchema)]
pub struct CreateNotificationDoc {
    /// Omit for a broadcast.
    pub user_id: Option<Uuid>,
    /// info | warning | critical
    pub severity: Option<String>,
    pub title: String,
    pub message: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::users::list,
        crate::routes::users::create,
        crate::routes::users::get,
        crate::routes::users::update,
        crate::routes::users::change_password,
        crate::routes::users::delete,
        crate::routes::equipment::list,
        crate::routes::equipment::create,
        crate::routes::equipment::get,
        crate::routes::equipment::update,
        crate::routes::equipment::delete,
        crate::routes::equipment::work_orders,
        crate::routes::equipment::report,
        crate::routes::work_orders::list,
        crate::routes::work_orders::create,
        crate::routes::work_orders::get,
        crate::routes::work_orders::update,
        crate::routes::work_orders::assign,
        crate::routes::work_orders::change_status,
        crate::routes::work_orders::delete,
        crate::routes::maintenance::list,
        crate::routes::maintenance::create,
        crate::routes::maintenance::get,
        crate::routes::maintenance::update,
        crate::routes::maintenance::delete,
        crate::routes::maintenance::suggestion,
        crate::routes::maintenance::run,
        crate::routes::documents::list,
        crate::routes::documents::create,
        crate::routes::documents::get,
        crate::routes::documents::delete,
        crate::routes::notifications::list,
        crate::routes::notifications::create,
        crate::routes::notifications::unread_count,
        crate::routes::notifications::read_all,
        crate::routes::notifications::mark_read,
        crate::routes::notifications::delete,
        crate::routes::audit_logs::list,
        crate::routes::dashboard::summary,
    ),
    components(
        schemas(
            HealthResponse,
            CreateUserDoc,
            UpdateUserDoc,
            ChangePasswordDoc,
            CreateEquipmentDoc,
            UpdateEquipmentDoc,
            CreateWorkOrderDoc,
            UpdateWorkOrderDoc,
            AssignDoc,
            StatusChangeDoc,
            CreatePlanDoc,
            UpdatePlanDoc,
            CreateDocumentDoc,
            CreateNotificationDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "users"),
        (name = "equipment"),
        (name = "work-orders"),
        (name = "maintenance"),
        (name = "documents"),
        (name = "notifications"),
        (name = "audit"),
        (name = "dashboard")
    )
)]
pub struct ApiDoc;

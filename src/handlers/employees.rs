use crate::auth::Claims;
use crate::database::{Employee, EmployeeChanges};
use crate::services::employees::CreateEmployeeInput;
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(equal = 12, message = "Aadhar must be 12 digits"))]
    pub aadhar: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    pub hire_date: NaiveDate,
}

// Unknown fields are rejected so a status change can never ride in on an
// ordinary update.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateEmployeeRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Position cannot be empty"))]
    pub position: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct TerminateEmployeeRequest {
    pub termination_date: NaiveDate,
    #[validate(length(min = 1, message = "Termination reason is required"))]
    pub termination_reason: String,
}

#[derive(Serialize)]
pub struct EmployeesData {
    pub employees: Vec<Employee>,
}

#[derive(Serialize)]
pub struct EmployeeData {
    pub employee: Employee,
}

pub async fn list_employees(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<EmployeesData>>, ApiError> {
    let employees = state.employee_service.list(&claims).await?;
    Ok(Json(ApiResponse::ok(EmployeesData { employees })))
}

pub async fn create_employee(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<ApiResponse<EmployeeData>>), ApiError> {
    let employee = state
        .employee_service
        .create(
            &claims,
            CreateEmployeeInput {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                email: request.email,
                aadhar: request.aadhar,
                position: request.position,
                hire_date: request.hire_date,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            EmployeeData { employee },
            "Employee created successfully",
        )),
    ))
}

pub async fn update_employee(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeData>>, ApiError> {
    let employee = state
        .employee_service
        .update(
            &claims,
            id,
            EmployeeChanges {
                first_name: request.first_name,
                last_name: request.last_name,
                phone: request.phone,
                email: request.email,
                position: request.position,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        EmployeeData { employee },
        "Employee updated successfully",
    )))
}

pub async fn terminate_employee(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<TerminateEmployeeRequest>,
) -> Result<Json<ApiResponse<EmployeeData>>, ApiError> {
    let employee = state
        .employee_service
        .terminate(
            &claims,
            id,
            request.termination_date,
            &request.termination_reason,
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        EmployeeData { employee },
        "Employee terminated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_request() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            first_name: "Arif".into(),
            last_name: "Khan".into(),
            phone: "9876543210".into(),
            email: "arif@example.com".into(),
            aadhar: "123412341234".into(),
            position: "Driver".into(),
            hire_date: NaiveDate::from_ymd_opt(2023, 4, 1).unwrap(),
        }
    }

    #[test]
    fn aadhar_must_be_exactly_twelve_characters() {
        let mut request = base_request();
        assert!(request.validate().is_ok());

        request.aadhar = "12345".into();
        assert!(request.validate().is_err());

        request.aadhar = "1234123412345".into();
        assert!(request.validate().is_err());
    }

    #[test]
    fn hire_date_parses_iso_format() {
        let body = serde_json::json!({
            "first_name": "Arif",
            "last_name": "Khan",
            "phone": "9876543210",
            "email": "arif@example.com",
            "aadhar": "123412341234",
            "position": "Driver",
            "hire_date": "2023-04-01",
        });
        let request: CreateEmployeeRequest = serde_json::from_value(body).unwrap();
        assert_eq!(
            request.hire_date,
            NaiveDate::from_ymd_opt(2023, 4, 1).unwrap()
        );
    }

    #[test]
    fn update_request_has_no_way_to_set_status() {
        // Termination is only reachable through its dedicated endpoint.
        let body = serde_json::json!({ "status": "active", "phone": "1" });
        let request: Result<UpdateEmployeeRequest, _> = serde_json::from_value(body);
        assert!(request.is_err());
    }
}

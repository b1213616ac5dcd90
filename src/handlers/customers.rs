use crate::auth::Claims;
use crate::database::{Customer, CustomerChanges, CustomerStatus, CustomerType};
use crate::services::customers::CreateCustomerInput;
use crate::state::AppState;
use crate::utils::{ApiError, ApiResponse, ValidatedJson};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomerRequest {
    #[serde(rename = "type")]
    pub kind: CustomerType,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name_or_entity: String,
    pub contact_person: Option<String>,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[validate(email(message = "Valid email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Official ID is required"))]
    pub official_id: String,
    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCustomerRequest {
    #[serde(rename = "type")]
    pub kind: Option<CustomerType>,
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name_or_entity: Option<String>,
    pub contact_person: Option<String>,
    #[validate(length(min = 1, message = "Phone cannot be empty"))]
    pub phone: Option<String>,
    #[validate(email(message = "Valid email is required"))]
    pub email: Option<String>,
    #[validate(length(min = 1, message = "Official ID cannot be empty"))]
    pub official_id: Option<String>,
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    pub status: Option<CustomerStatus>,
}

#[derive(Serialize)]
pub struct CustomersData {
    pub customers: Vec<Customer>,
}

#[derive(Serialize)]
pub struct CustomerData {
    pub customer: Customer,
}

pub async fn list_customers(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Json<ApiResponse<CustomersData>>, ApiError> {
    let customers = state.customer_service.list(&claims).await?;
    Ok(Json(ApiResponse::ok(CustomersData { customers })))
}

pub async fn create_customer(
    State(state): State<AppState>,
    claims: Claims,
    ValidatedJson(request): ValidatedJson<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CustomerData>>), ApiError> {
    let customer = state
        .customer_service
        .create(
            &claims,
            CreateCustomerInput {
                kind: request.kind,
                name_or_entity: request.name_or_entity,
                contact_person: request.contact_person,
                phone: request.phone,
                email: request.email,
                official_id: request.official_id,
                address: request.address,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok_with_message(
            CustomerData { customer },
            "Customer created successfully",
        )),
    ))
}

pub async fn update_customer(
    State(state): State<AppState>,
    claims: Claims,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<CustomerData>>, ApiError> {
    let customer = state
        .customer_service
        .update(
            &claims,
            id,
            CustomerChanges {
                kind: request.kind,
                name_or_entity: request.name_or_entity,
                contact_person: request.contact_person,
                phone: request.phone,
                email: request.email,
                official_id: request.official_id,
                address: request.address,
                status: request.status,
            },
        )
        .await?;

    Ok(Json(ApiResponse::ok_with_message(
        CustomerData { customer },
        "Customer updated successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_type_uses_the_wire_name() {
        let body = serde_json::json!({
            "type": "government",
            "name_or_entity": "PWD Srinagar",
            "phone": "0194222222",
            "email": "pwd@example.com",
            "official_id": "GOV-42",
            "address": "Srinagar",
        });
        let request: CreateCustomerRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.kind, CustomerType::Government);
        assert!(request.contact_person.is_none());
        assert!(request.validate().is_ok());
    }

    #[test]
    fn status_round_trips_through_update_body() {
        let body = serde_json::json!({ "status": "inactive" });
        let request: UpdateCustomerRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.status, Some(CustomerStatus::Inactive));
    }
}

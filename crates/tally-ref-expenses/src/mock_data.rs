//! Fictional expense claims used by the reference scenarios.
//!
//! Each function returns a complete request envelope, shaped the way the
//! assistant hands claims to the validator.

use serde_json::json;

use tally_contracts::expense::ValidationRequest;

/// Deserialize a fixture envelope.
///
/// # Panics
///
/// Panics when the literal is not a valid request, naming the fixture.
pub(crate) fn request(fixture: &str, value: serde_json::Value) -> ValidationRequest {
    serde_json::from_value(value)
        .unwrap_or_else(|err| panic!("fixture '{fixture}' is not a valid request: {err}"))
}

pub fn routine_lodging() -> ValidationRequest {
    request("routine_lodging", json!({
        "expense": {
            "vendor_name": "Hotel Simple",
            "date": "2025-12-01",
            "total_amount": 300,
            "expense_category": "lodging"
        },
        "attachments": ["receipt.jpg"],
        "user_id": "emp-1001"
    }))
}

pub fn incomplete_meal() -> ValidationRequest {
    request("incomplete_meal", json!({
        "expense": {
            "vendor_name": "Vendor X",
            "expense_category": "meals"
        },
        "attachments": ["receipt.jpg"],
        "user_id": "emp-1002"
    }))
}

pub fn undocumented_consulting() -> ValidationRequest {
    request("undocumented_consulting", json!({
        "expense": {
            "vendor_name": "Consulting Co",
            "date": "2025-12-01",
            "total_amount": 2500,
            "expense_category": "other"
        },
        "user_id": "emp-1003"
    }))
}

pub fn lodging_over_limit() -> ValidationRequest {
    request("lodging_over_limit", json!({
        "expense": {
            "vendor_name": "Hotel Lux",
            "date": "2025-12-01",
            "total_amount": 900,
            "expense_category": "lodging",
            "nights": 3
        },
        "attachments": ["receipt.jpg"],
        "user_id": "emp-1004"
    }))
}

pub fn supplies_without_receipt() -> ValidationRequest {
    request("supplies_without_receipt", json!({
        "expense": {
            "vendor_name": "Office Supplies",
            "date": "2025-12-02",
            "total_amount": 45,
            "expense_category": "supplies"
        },
        "user_id": "emp-1005"
    }))
}

pub fn travel_over_airfare_limit() -> ValidationRequest {
    request("travel_over_airfare_limit", json!({
        "expense": {
            "vendor_name": "Northwind Airlines",
            "date": "2025-11-18",
            "total_amount": 1850.40,
            "expense_category": "Travel",
            "justification": "Customer escalation onsite in Lisbon",
            "cost_center": "CC-4410"
        },
        "attachments": ["itinerary.pdf", "receipt.jpg"],
        "user_id": "emp-1006"
    }))
}

pub fn unknown_category() -> ValidationRequest {
    request("unknown_category", json!({
        "expense": {
            "vendor_name": "Gizmo Shop",
            "date": "2025-11-21",
            "total_amount": 80,
            "expense_category": "Gadgets"
        },
        "attachments": ["receipt.jpg"],
        "user_id": "emp-1007"
    }))
}

pub fn documented_high_value() -> ValidationRequest {
    request("documented_high_value", json!({
        "expense": {
            "vendor_name": "Consulting Co",
            "date": "2025-12-01",
            "total_amount": 2500,
            "expense_category": "other",
            "justification": "Quarterly architecture review"
        },
        "attachments": ["invoice.pdf"],
        "approver": "finance-director",
        "user_id": "emp-1008"
    }))
}

pub fn lodging_with_raised_limit() -> ValidationRequest {
    request("lodging_with_raised_limit", json!({
        "expense": {
            "vendor_name": "Hotel Lux",
            "date": "2025-12-01",
            "total_amount": 900,
            "expense_category": "lodging",
            "nights": 3
        },
        "attachments": ["receipt.jpg"],
        "policy_overrides": { "lodging_limit_per_night": 350.0 },
        "user_id": "emp-1009"
    }))
}

pub fn taxi_with_claimed_amount() -> ValidationRequest {
    request("taxi_with_claimed_amount", json!({
        "extracted_data": {
            "vendor_name": "City Cabs",
            "date": "2025-12-04",
            "expense_category": "transportation"
        },
        "claimed_amount": "42.00",
        "receipts": ["cab.jpg"],
        "user_id": "emp-1010"
    }))
}

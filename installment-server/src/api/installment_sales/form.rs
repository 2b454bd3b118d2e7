//! Sale creation form
//!
//! Reads the `multipart/form-data` body of `POST /api/installment-sales`
//! into a [`SaleCreate`] plus the optional customer photo. Every missing or
//! malformed field is reported in one `ValidationFailed` error.

use std::collections::HashMap;

use axum::extract::Multipart;
use shared::models::{CustomerInput, GuarantorInput, PricingStrategy, SaleCreate, SaleTerms};

use crate::utils::AppError;
use crate::utils::validation::{
    FieldErrors, MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN,
};

const IMAGE_FIELD: &str = "customer_image";

/// Uploaded file part
#[derive(Debug)]
pub struct UploadedImage {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed sale form
#[derive(Debug)]
pub struct SaleForm {
    pub sale: SaleCreate,
    pub image: Option<UploadedImage>,
}

/// Drain the multipart stream: text parts into a map, the photo kept aside
pub async fn read_multipart(mut multipart: Multipart) -> Result<SaleForm, AppError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::invalid_request(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::invalid_request(format!("Failed to read file: {}", e)))?;
            // 未选择文件时浏览器仍会发送空的文件字段
            if filename.is_empty() && data.is_empty() {
                continue;
            }
            image = Some(UploadedImage {
                filename,
                data: data.to_vec(),
            });
        } else {
            let value = field.text().await.map_err(|e| {
                AppError::invalid_request(format!("Failed to read field {}: {}", name, e))
            })?;
            fields.insert(name, value);
        }
    }

    let sale = parse_fields(&fields)?;
    Ok(SaleForm { sale, image })
}

/// Build the sale payload from the text parts
pub fn parse_fields(fields: &HashMap<String, String>) -> Result<SaleCreate, AppError> {
    let get = |key: &str| fields.get(key).map(String::as_str);
    let mut errors = FieldErrors::new();

    let product_id = errors.required_integer("product_id", get("product_id"));

    let customer_name = errors.required_text("customer_name", get("customer_name"), MAX_NAME_LEN);
    let customer_address =
        errors.optional_text("customer_address", get("customer_address"), MAX_ADDRESS_LEN);
    let customer_phone =
        errors.required_text("customer_phone", get("customer_phone"), MAX_SHORT_TEXT_LEN);
    let customer_cnic =
        errors.required_text("customer_cnic", get("customer_cnic"), MAX_SHORT_TEXT_LEN);

    let guarantor_name = errors.required_text("guarantor_name", get("guarantor_name"), MAX_NAME_LEN);
    let guarantor_address =
        errors.optional_text("guarantor_address", get("guarantor_address"), MAX_ADDRESS_LEN);
    let guarantor_phone =
        errors.required_text("guarantor_phone", get("guarantor_phone"), MAX_SHORT_TEXT_LEN);
    let guarantor_cnic =
        errors.required_text("guarantor_cnic", get("guarantor_cnic"), MAX_SHORT_TEXT_LEN);
    let guarantor_relationship = errors.required_text(
        "guarantor_relationship",
        get("guarantor_relationship"),
        MAX_SHORT_TEXT_LEN,
    );

    let price = errors.required_number("details_price", get("details_price"));
    let profit = errors.optional_number("details_profit", get("details_profit"));
    let interest_rate =
        errors.optional_number("details_interest_rate", get("details_interest_rate"));
    let total = errors.optional_number("details_total", get("details_total"));
    let down_payment = errors.required_number("details_down_payment", get("details_down_payment"));
    let monthly_installment = errors.optional_number(
        "details_monthly_installment",
        get("details_monthly_installment"),
    );
    let duration = errors.required_integer("details_duration", get("details_duration"));

    let pricing = match (profit, interest_rate) {
        (Some(profit), None) => Some(PricingStrategy::FlatProfit { profit }),
        (None, Some(rate_percent)) => Some(PricingStrategy::InterestRate { rate_percent }),
        (Some(_), Some(_)) => {
            errors.add(
                "details_interest_rate",
                "send either details_profit or details_interest_rate, not both",
            );
            None
        }
        (None, None) => {
            // 数字格式错误时已经记录过了
            if get("details_profit").is_none_or(|v| v.trim().is_empty())
                && get("details_interest_rate").is_none_or(|v| v.trim().is_empty())
            {
                errors.add(
                    "details_profit",
                    "details_profit or details_interest_rate is required",
                );
            }
            None
        }
    };

    // 任一字段缺失时 finish() 必然返回错误
    errors.finish()?;

    match (
        product_id,
        customer_name,
        customer_phone,
        customer_cnic,
        guarantor_name,
        guarantor_phone,
        guarantor_cnic,
        guarantor_relationship,
        price,
        pricing,
        down_payment,
        duration,
    ) {
        (
            Some(product_id),
            Some(customer_name),
            Some(customer_phone),
            Some(customer_cnic),
            Some(guarantor_name),
            Some(guarantor_phone),
            Some(guarantor_cnic),
            Some(guarantor_relationship),
            Some(price),
            Some(pricing),
            Some(down_payment),
            Some(duration),
        ) => Ok(SaleCreate {
            product_id,
            customer: CustomerInput {
                name: customer_name,
                address: customer_address,
                phone: customer_phone,
                cnic: customer_cnic,
            },
            guarantor: GuarantorInput {
                name: guarantor_name,
                address: guarantor_address,
                phone: Some(guarantor_phone),
                cnic: Some(guarantor_cnic),
                relationship: Some(guarantor_relationship),
            },
            terms: SaleTerms {
                price,
                pricing,
                total,
                down_payment,
                monthly_installment,
                duration,
            },
        }),
        _ => Err(AppError::validation("Incomplete sale form")),
    }
}

//! Admin form parsing and validation.
//!
//! Form fields arrive as strings; validation happens here, before any backend
//! request is issued. A validation failure re-renders the form with field
//! errors and issues no request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shopfusion_core::{Category, CategoryId, Product};

/// Maximum allowed product rating.
const MAX_RATING: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validated product payload, serialized as the backend's wire shape.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: String,
    pub category_id: CategoryId,
    pub stock: u32,
    pub rating: Decimal,
    pub reviews: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Raw product form data as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub reviews: String,
    #[serde(default)]
    pub brand: String,
}

impl ProductForm {
    /// Pre-fill the form from an existing product (edit view).
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            category_id: product.category_id.to_string(),
            stock: product.stock.to_string(),
            rating: product.rating.to_string(),
            reviews: product.reviews.to_string(),
            brand: product.brand.clone().unwrap_or_default(),
        }
    }

    /// Validate the form into a backend payload.
    ///
    /// # Errors
    ///
    /// Returns every field violation: empty name, negative price, negative
    /// stock, rating outside `[0, 5]`, negative reviews, or unparseable
    /// numeric fields.
    pub fn validate(&self) -> Result<ProductPayload, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }

        let price = match self.price.trim().parse::<Decimal>() {
            Ok(price) if price >= Decimal::ZERO => Some(price),
            Ok(_) => {
                errors.push(FieldError::new("price", "Price must be 0 or greater"));
                None
            }
            Err(_) => {
                errors.push(FieldError::new("price", "Price must be a number"));
                None
            }
        };

        let category_id = match self.category_id.trim().parse::<i64>() {
            Ok(id) => Some(CategoryId::new(id)),
            Err(_) => {
                errors.push(FieldError::new("category_id", "Category is required"));
                None
            }
        };

        let stock = match self.stock.trim().parse::<u32>() {
            Ok(stock) => Some(stock),
            Err(_) => {
                errors.push(FieldError::new(
                    "stock",
                    "Stock must be a whole number, 0 or greater",
                ));
                None
            }
        };

        let rating = if self.rating.trim().is_empty() {
            Some(Decimal::ZERO)
        } else {
            match self.rating.trim().parse::<Decimal>() {
                Ok(rating) if rating >= Decimal::ZERO && rating <= MAX_RATING => Some(rating),
                Ok(_) => {
                    errors.push(FieldError::new("rating", "Rating must be between 0 and 5"));
                    None
                }
                Err(_) => {
                    errors.push(FieldError::new("rating", "Rating must be a number"));
                    None
                }
            }
        };

        let reviews = if self.reviews.trim().is_empty() {
            Some(0)
        } else {
            match self.reviews.trim().parse::<u32>() {
                Ok(reviews) => Some(reviews),
                Err(_) => {
                    errors.push(FieldError::new(
                        "reviews",
                        "Reviews must be a whole number, 0 or greater",
                    ));
                    None
                }
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        // All None cases pushed an error above
        let (Some(price), Some(category_id), Some(stock), Some(rating), Some(reviews)) =
            (price, category_id, stock, rating, reviews)
        else {
            return Err(errors);
        };

        let brand = self.brand.trim();

        Ok(ProductPayload {
            name: name.to_string(),
            description: self.description.trim().to_string(),
            price,
            image: self.image.trim().to_string(),
            category_id,
            stock,
            rating,
            reviews,
            brand: (!brand.is_empty()).then(|| brand.to_string()),
        })
    }
}

/// Validated category payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub name: String,
    pub description: String,
}

/// Raw category form data as submitted by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CategoryForm {
    /// Pre-fill the form from an existing category (edit view).
    #[must_use]
    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }

    /// Validate the form into a backend payload.
    ///
    /// # Errors
    ///
    /// Returns a field error if the name is empty.
    pub fn validate(&self) -> Result<CategoryPayload, Vec<FieldError>> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(vec![FieldError::new("name", "Name is required")]);
        }

        Ok(CategoryPayload {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ProductForm {
        ProductForm {
            name: "Desk Lamp".to_string(),
            description: "Adjustable arm".to_string(),
            price: "34.99".to_string(),
            image: "https://img.example.com/lamp.jpg".to_string(),
            category_id: "2".to_string(),
            stock: "14".to_string(),
            rating: "4.5".to_string(),
            reviews: "37".to_string(),
            brand: "Lumen".to_string(),
        }
    }

    fn error_fields(errors: &[FieldError]) -> Vec<&'static str> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_form_produces_payload() {
        let payload = valid_form().validate().expect("form should validate");
        assert_eq!(payload.name, "Desk Lamp");
        assert_eq!(payload.price, "34.99".parse().unwrap());
        assert_eq!(payload.stock, 14);
        assert_eq!(payload.brand.as_deref(), Some("Lumen"));
    }

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = valid_form().validate().expect("form should validate");
        let json = serde_json::to_value(&payload).expect("payload serializes");
        assert!(json.get("categoryId").is_some());
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let form = ProductForm {
            name: "   ".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("blank name should fail");
        assert_eq!(error_fields(&errors), vec!["name"]);
    }

    #[test]
    fn test_negative_price_rejected() {
        let form = ProductForm {
            price: "-1".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("negative price should fail");
        assert_eq!(error_fields(&errors), vec!["price"]);
    }

    #[test]
    fn test_negative_stock_rejected() {
        let form = ProductForm {
            stock: "-5".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("negative stock should fail");
        assert_eq!(error_fields(&errors), vec!["stock"]);
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        let form = ProductForm {
            rating: "5.1".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("rating over 5 should fail");
        assert_eq!(error_fields(&errors), vec!["rating"]);

        let form = ProductForm {
            rating: "-0.5".to_string(),
            ..valid_form()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let form = ProductForm {
            rating: String::new(),
            reviews: String::new(),
            brand: String::new(),
            ..valid_form()
        };
        let payload = form.validate().expect("blanks should default");
        assert_eq!(payload.rating, Decimal::ZERO);
        assert_eq!(payload.reviews, 0);
        assert!(payload.brand.is_none());
    }

    #[test]
    fn test_multiple_violations_all_reported() {
        let form = ProductForm {
            name: String::new(),
            price: "abc".to_string(),
            stock: "-1".to_string(),
            ..valid_form()
        };
        let errors = form.validate().expect_err("three violations");
        assert_eq!(error_fields(&errors), vec!["name", "price", "stock"]);
    }

    #[test]
    fn test_category_form_requires_name() {
        let form = CategoryForm::default();
        assert!(form.validate().is_err());

        let form = CategoryForm {
            name: "Office".to_string(),
            description: String::new(),
        };
        assert!(form.validate().is_ok());
    }
}

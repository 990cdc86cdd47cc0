//! Schema module - the fixed field set of the `sales` collection

/// Collection every descriptor targets in this deployment
pub const COLLECTION_NAME: &str = "sales";

/// Sentinel used when no field could be inferred
pub const UNKNOWN_FIELD: &str = "unknown";

/// Semantic type of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Value is compared as an integer
    Integer,

    /// Value is compared as a string
    Text,
}

/// A recognized field of the `sales` collection
///
/// Each field carries the content hint and the value-shape heuristic the
/// model is told to use when mapping a question onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaField {
    /// Large, unique invoice number (6+ digits)
    InvoiceNo,

    /// Alphanumeric product code
    StockCode,

    /// Free-text product description
    Description,

    /// Small count of items
    Quantity,

    /// Medium-sized customer number (5 digits)
    CustomerId,

    /// Geographic location
    Country,
}

impl SchemaField {
    /// All fields, in the order they are presented to the model
    pub const ALL: [SchemaField; 6] = [
        SchemaField::InvoiceNo,
        SchemaField::StockCode,
        SchemaField::Description,
        SchemaField::Quantity,
        SchemaField::CustomerId,
        SchemaField::Country,
    ];

    /// Wire identifier of the field
    pub fn name(&self) -> &'static str {
        match self {
            SchemaField::InvoiceNo => "InvoiceNo",
            SchemaField::StockCode => "StockCode",
            SchemaField::Description => "Description",
            SchemaField::Quantity => "Quantity",
            SchemaField::CustomerId => "CustomerID",
            SchemaField::Country => "Country",
        }
    }

    /// Resolve a wire identifier (case-sensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    /// Declared value type
    pub fn value_kind(&self) -> ValueKind {
        match self {
            SchemaField::InvoiceNo | SchemaField::Quantity | SchemaField::CustomerId => {
                ValueKind::Integer
            }
            SchemaField::StockCode | SchemaField::Description | SchemaField::Country => {
                ValueKind::Text
            }
        }
    }

    /// Whether values of this field must be integers
    pub fn is_numeric(&self) -> bool {
        self.value_kind() == ValueKind::Integer
    }

    /// Content hint shown in the data context section of the prompt
    pub fn description(&self) -> &'static str {
        match self {
            SchemaField::InvoiceNo => "Large, unique integer IDs (e.g., 536365)",
            SchemaField::StockCode => "Alphanumeric product codes (e.g., \"85123A\")",
            SchemaField::Description => {
                "Product text strings (e.g., \"WHITE HANGING HEART T-LIGHT HOLDER\")"
            }
            SchemaField::Quantity => "Integers representing count (e.g., 6, 12)",
            SchemaField::CustomerId => "Medium-sized integer IDs (e.g., 17850)",
            SchemaField::Country => {
                "Geographic location strings (e.g., \"United Kingdom\", \"France\", \"California\")"
            }
        }
    }

    /// Value shape that maps onto this field
    pub fn inference_rule(&self) -> &'static str {
        match self {
            SchemaField::Country => "Geographic strings",
            SchemaField::StockCode => "Alphanumeric codes",
            SchemaField::InvoiceNo => "Large integers (6+ digits)",
            SchemaField::CustomerId => "Medium integers (5 digits)",
            SchemaField::Description => "Descriptive text",
            SchemaField::Quantity => "Small numeric values indicating count",
        }
    }
}

impl std::fmt::Display for SchemaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for field in SchemaField::ALL {
            assert_eq!(SchemaField::from_name(field.name()), Some(field));
        }
    }

    #[test]
    fn test_customer_id_wire_name() {
        assert_eq!(SchemaField::CustomerId.name(), "CustomerID");
        assert_eq!(SchemaField::from_name("CustomerId"), None);
    }

    #[test]
    fn test_from_name_is_case_sensitive() {
        assert_eq!(SchemaField::from_name("country"), None);
        assert_eq!(SchemaField::from_name(UNKNOWN_FIELD), None);
    }

    #[test]
    fn test_numeric_fields() {
        let numeric: Vec<_> = SchemaField::ALL
            .into_iter()
            .filter(SchemaField::is_numeric)
            .collect();
        assert_eq!(
            numeric,
            vec![
                SchemaField::InvoiceNo,
                SchemaField::Quantity,
                SchemaField::CustomerId
            ]
        );
    }
}

/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 19/10/26
******************************************************************************/

//! Monetary field declarations of every API resource
//!
//! A [`MoneySchema`] lists the currency fields of a record and, for nested
//! lists of records (a contract's `ur_list`, an operation's `payments`...),
//! the schema applied to each element.

use crate::error::AppError;
use crate::model::money::{self, MoneyFields, Record};
use serde_json::Value;

/// Monetary layout of one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoneySchema {
    /// Currency fields of the record itself
    pub fields: &'static MoneyFields,
    /// Nested lists of records and the schema of their elements
    pub nested: &'static [(&'static str, &'static MoneySchema)],
}

impl MoneySchema {
    /// Schema without any currency field
    pub const NONE: MoneySchema = MoneySchema {
        fields: &[],
        nested: &[],
    };

    /// Creates a flat schema
    #[must_use]
    pub const fn flat(fields: &'static MoneyFields) -> Self {
        Self { fields, nested: &[] }
    }

    /// Wire to domain: converts minor units into major units
    pub fn decode(&self, value: Value) -> Result<Value, AppError> {
        self.apply(value, money::to_major)
    }

    /// Domain to wire: converts major units into minor units
    pub fn encode(&self, value: Value) -> Result<Value, AppError> {
        self.apply(value, money::to_minor)
    }

    fn apply(
        &self,
        value: Value,
        convert: fn(Record, &MoneyFields) -> Result<Record, AppError>,
    ) -> Result<Value, AppError> {
        match value {
            Value::Object(record) => self.apply_record(record, convert).map(Value::Object),
            Value::Array(items) => items
                .into_iter()
                .map(|item| self.apply(item, convert))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            other => Ok(other),
        }
    }

    fn apply_record(
        &self,
        record: Record,
        convert: fn(Record, &MoneyFields) -> Result<Record, AppError>,
    ) -> Result<Record, AppError> {
        let mut record = convert(record, self.fields)?;
        for (name, schema) in self.nested {
            if let Some(child) = record.remove(*name) {
                let child = match child {
                    Value::Null => Value::Null,
                    other => schema.apply(other, convert)?,
                };
                record.insert((*name).to_string(), child);
            }
        }
        Ok(record)
    }
}

/// Receivable unit attached to a contract
pub const CONTRACT_UR: MoneySchema =
    MoneySchema::flat(&["effect_amount", "committed_effect_amount"]);

/// Contract
pub const CONTRACT: MoneySchema = MoneySchema {
    fields: &["balance_due", "committed_effect_amount"],
    nested: &[("ur_list", &CONTRACT_UR)],
};

/// Receivable unit inside an ownership assignment position
pub const ASSIGNMENT_UR: MoneySchema = MoneySchema::flat(&["value_available"]);

/// Position of an ownership assignment (fixed amount) contract request
pub const ASSIGNMENT_POSITION: MoneySchema = MoneySchema {
    fields: &[],
    nested: &[("ur_list", &ASSIGNMENT_UR)],
};

/// Ownership assignment contract request
pub const OWNERSHIP_ASSIGNMENT: MoneySchema = MoneySchema {
    fields: &[],
    nested: &[("positions", &ASSIGNMENT_POSITION)],
};

/// Receivable unit summary inside a position report
pub const POSITION_UR: MoneySchema = MoneySchema::flat(&["ur_amount", "value_available"]);

/// Position report
pub const POSITION: MoneySchema = MoneySchema {
    fields: &["total_ur_amount", "total_value_available"],
    nested: &[("ur_list_resume", &POSITION_UR)],
};

/// Recurrence agreement
pub const RECURRENCE: MoneySchema = MoneySchema::flat(&["discount_rate_per_year"]);

/// Page of recurrences
pub const RECURRENCE_LIST: MoneySchema = MoneySchema {
    fields: &[],
    nested: &[("recurrences", &RECURRENCE)],
};

/// Receivable unit settled in an operation
pub const OPERATION_UR: MoneySchema = MoneySchema::flat(&[
    "amount",
    "discount_rate_per_year",
    "discount_rate",
    "discount_amount",
    "amount_due",
]);

/// Payment made for an operation
pub const PAYMENT: MoneySchema = MoneySchema::flat(&["amount_paid"]);

/// Settlement operation under a recurrence
pub const OPERATION: MoneySchema = MoneySchema {
    fields: &["amount", "amount_due", "amount_paid"],
    nested: &[
        ("operation_receivable_units", &OPERATION_UR),
        ("payments", &PAYMENT),
    ],
};

/// Page of operations
pub const OPERATION_LIST: MoneySchema = MoneySchema {
    fields: &[],
    nested: &[("operations", &OPERATION)],
};

/// Operation summary inside a recurrence receivable unit
pub const OPERATION_RESUME: MoneySchema = MoneySchema::flat(&[
    "previous_ur_amount",
    "previous_total_operated_amount_gross",
    "previous_total_operated_amount_net",
    "ur_amount",
    "operated_amount_gross",
    "operated_amount_net",
    "total_operated_amount_gross",
    "total_operated_amount_net",
]);

/// Recurrence receivable unit (RRU)
pub const RRU: MoneySchema = MoneySchema {
    fields: &[
        "amount",
        "total_operated_amount_gross",
        "total_operated_amount_net",
        "available_amount",
        "previous_amount",
        "previous_operated_amount_gross",
        "previous_operated_amount_net",
    ],
    nested: &[("operations", &OPERATION_RESUME)],
};

/// Page of recurrence receivable units
pub const RRU_LIST: MoneySchema = MoneySchema {
    fields: &[],
    nested: &[("rrus", &RRU)],
};

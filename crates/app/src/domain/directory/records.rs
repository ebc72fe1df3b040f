//! Directory Records

use jiff::Timestamp;
use marketplace::{
    actors::{Role, UserUuid},
    businesses::{Address, BusinessType, BusinessUuid},
    inventory::ProductUuid,
};

/// User Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub name: String,
    pub role: Role,
    pub created_at: Timestamp,
}

/// Business Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessRecord {
    pub uuid: BusinessUuid,
    pub name: String,
    pub business_type: BusinessType,
    pub address: Address,
    pub created_at: Timestamp,
}

/// Product Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub business_uuid: BusinessUuid,
    pub code: String,
    pub name: String,
    pub barcode: Option<String>,
    pub created_at: Timestamp,
}

//! Directory Data

use marketplace::{
    actors::{Role, UserUuid},
    businesses::{Address, BusinessType, BusinessUuid},
    inventory::ProductUuid,
};

/// New User
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub uuid: UserUuid,
    pub name: String,
    pub role: Role,
}

/// New Business
#[derive(Debug, Clone, PartialEq)]
pub struct NewBusiness {
    pub uuid: BusinessUuid,
    pub name: String,
    pub business_type: BusinessType,
    pub address: Address,
    pub administrators: Vec<UserUuid>,
}

/// New Product
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub business_uuid: BusinessUuid,
    pub code: String,
    pub name: String,
    pub barcode: Option<String>,
}

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::rooms::RoomSummaryDto;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCheckoutModel {
    pub room_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutDto {
    pub checkout_url: String,
    pub room: RoomSummaryDto,
}

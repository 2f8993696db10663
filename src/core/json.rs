use crate::core::errors::Result;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/*-------------------------------------------------------------------------------------------------
  Parse JSON
-------------------------------------------------------------------------------------------------*/

pub fn parse(json: &str) -> Result<JsonServiceTags<'_>> {
    Ok(serde_json::from_str(json)?)
}

/*-------------------------------------------------------------------------------------------------
  JSON Data Structures
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  JSON Service Tags
--------------------------------------------------------------------------------------*/

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonServiceTags<'j> {
    #[serde(rename = "changeNumber", default, skip_serializing_if = "Option::is_none")]
    pub change_number: Option<u64>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub cloud: Option<Cow<'j, str>>,

    #[serde(borrow)]
    pub values: Vec<JsonServiceTag<'j>>,
}

/*--------------------------------------------------------------------------------------
  JSON Service Tag
--------------------------------------------------------------------------------------*/

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct JsonServiceTag<'j> {
    #[serde(borrow)]
    pub name: Cow<'j, str>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Cow<'j, str>>,

    #[serde(borrow)]
    pub properties: JsonProperties<'j>,
}

/*--------------------------------------------------------------------------------------
  JSON Service Tag Properties
--------------------------------------------------------------------------------------*/

#[derive(Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonProperties<'j> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_number: Option<u64>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub region: Option<Cow<'j, str>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<u64>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Cow<'j, str>>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub system_service: Option<Cow<'j, str>>,

    #[serde(borrow, default)]
    pub address_prefixes: Vec<Cow<'j, str>>,

    #[serde(borrow, default, skip_serializing_if = "Option::is_none")]
    pub network_features: Option<Vec<Cow<'j, str>>>,
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

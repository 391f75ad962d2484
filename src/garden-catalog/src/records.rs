//! Typed catalog records and their source-row coercions.

use crate::error::SchemaError;
use crate::table::{FromRow, RowView, ToRow};
use crate::types::{IconBucket, PlacementKind, ShinyTier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Columns shared by every generic item table
pub const ITEM_COLUMNS: &[&str] = &[
    "id",
    "name",
    "icon",
    "type",
    "subtype",
    "category",
    "description",
    "value",
    "level",
];

pub const PLANT_COLUMNS: &[&str] = &[
    "id",
    "name",
    "icon",
    "type",
    "subtype",
    "category",
    "description",
    "value",
    "level",
    "baseExp",
    "growTime",
    "repeatedGrowTime",
    "numHarvests",
];

/// Base shape shared by placed and inventory items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub icon: String,
    #[serde(rename = "type")]
    pub item_type: PlacementKind,
    pub subtype: String,
    pub category: String,
    pub description: String,
    pub value: u64,
    pub level: u32,
    /// Present whenever the source table has a `transformId` column.
    /// An empty string means the item converts into nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transform_id: Option<String>,
}

impl Item {
    /// The transform target, if the item links to one
    pub fn transform_target(&self) -> Option<&str> {
        self.transform_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl FromRow for Item {
    const COLUMNS: &'static [&'static str] = ITEM_COLUMNS;

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        let item_type = row
            .text("type")?
            .parse()
            .map_err(|_| row.reject("type", "PlacedItem or InventoryItem"))?;

        Ok(Item {
            id: row.text("id")?,
            name: row.text("name")?,
            icon: row.text("icon")?,
            item_type,
            subtype: row.text("subtype")?,
            category: row.text("category")?,
            description: row.text("description")?,
            value: row.uint("value")?,
            level: row.uint("level")?,
            transform_id: row.opt_text("transformId"),
        })
    }
}

impl ToRow for Item {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "icon",
        "type",
        "subtype",
        "category",
        "description",
        "value",
        "level",
        "transformId",
    ];

    fn cell(&self, column: &str) -> Option<String> {
        let text = match column {
            "id" => self.id.clone(),
            "name" => self.name.clone(),
            "icon" => self.icon.clone(),
            "type" => self.item_type.to_string(),
            "subtype" => self.subtype.clone(),
            "category" => self.category.clone(),
            "description" => self.description.clone(),
            "value" => self.value.to_string(),
            "level" => self.level.to_string(),
            "transformId" => return self.transform_id.clone(),
            _ => return None,
        };
        Some(text)
    }
}

/// One shiny tier entry of a plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShinyRef {
    pub id: String,
    pub probability: f64,
}

/// A growable plant with its harvest timings and shiny tier table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(flatten)]
    pub item: Item,
    pub base_exp: u32,
    pub grow_time: u64,
    pub repeated_grow_time: u64,
    pub num_harvests: u32,
    /// Tier name → shiny item; always present, possibly empty
    #[serde(default)]
    pub transform_shiny_ids: BTreeMap<String, ShinyRef>,
}

impl FromRow for Plant {
    const COLUMNS: &'static [&'static str] = PLANT_COLUMNS;

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        Ok(Plant {
            item: Item::from_row(row)?,
            base_exp: row.uint("baseExp")?,
            grow_time: row.uint("growTime")?,
            repeated_grow_time: row.uint("repeatedGrowTime")?,
            num_harvests: row.uint("numHarvests")?,
            transform_shiny_ids: BTreeMap::new(),
        })
    }
}

impl ToRow for Plant {
    const HEADER: &'static [&'static str] = &[
        "id",
        "name",
        "icon",
        "type",
        "subtype",
        "category",
        "description",
        "value",
        "level",
        "transformId",
        "baseExp",
        "growTime",
        "repeatedGrowTime",
        "numHarvests",
    ];

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "baseExp" => Some(self.base_exp.to_string()),
            "growTime" => Some(self.grow_time.to_string()),
            "repeatedGrowTime" => Some(self.repeated_grow_time.to_string()),
            "numHarvests" => Some(self.num_harvests.to_string()),
            _ => self.item.cell(column),
        }
    }
}

/// An egg, either placed in a pen or held in inventory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Egg {
    #[serde(flatten)]
    pub item: Item,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_exp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grow_time: Option<u64>,
}

impl FromRow for Egg {
    const COLUMNS: &'static [&'static str] = ITEM_COLUMNS;

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        Ok(Egg {
            item: Item::from_row(row)?,
            base_exp: row.opt_uint("baseExp")?,
            grow_time: row.opt_uint("growTime")?,
        })
    }
}

/// A garden tool; `tool_type` picks its bucket in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub tool_type: String,
    pub icon: String,
    pub description: String,
    pub value: u64,
    pub level: u32,
}

impl Tool {
    /// Catalog bucket for this tool's type (`Shovel` → `Shovels`)
    pub fn bucket(&self) -> String {
        pluralize(&self.tool_type)
    }
}

impl FromRow for Tool {
    const COLUMNS: &'static [&'static str] =
        &["id", "name", "type", "icon", "description", "value", "level"];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        let tool_type = row.text("type")?;
        if tool_type.is_empty() {
            return Err(row.reject("type", "tool type name"));
        }
        Ok(Tool {
            id: row.text("id")?,
            name: row.text("name")?,
            tool_type,
            icon: row.text("icon")?,
            description: row.text("description")?,
            value: row.uint("value")?,
            level: row.uint("level")?,
        })
    }
}

/// English plural used for tool buckets
pub fn pluralize(word: &str) -> String {
    let lower = word.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        format!("{}es", word)
    } else if lower.ends_with('y')
        && !lower
            .chars()
            .rev()
            .nth(1)
            .is_some_and(|c| "aeiou".contains(c))
    {
        format!("{}ies", &word[..word.len() - 1])
    } else {
        format!("{}s", word)
    }
}

/// A store and the stocklist it sells from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: u32,
    pub name: String,
    pub stocklist_id: String,
    pub stocklist_name: String,
    pub buy_multiplier: f64,
    pub sell_multiplier: f64,
    pub upgrade_multiplier: f64,
    /// Seconds between restocks
    pub restock_interval: u64,
}

impl FromRow for Store {
    const COLUMNS: &'static [&'static str] = &[
        "id",
        "name",
        "stocklistId",
        "stocklistName",
        "buyMultiplier",
        "sellMultiplier",
        "upgradeMultiplier",
        "restockInterval",
    ];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        Ok(Store {
            id: row.uint("id")?,
            name: row.text("name")?,
            stocklist_id: row.text("stocklistId")?,
            stocklist_name: row.text("stocklistName")?,
            buy_multiplier: row.float("buyMultiplier")?,
            sell_multiplier: row.float("sellMultiplier")?,
            upgrade_multiplier: row.float("upgradeMultiplier")?,
            restock_interval: row.uint("restockInterval")?,
        })
    }
}

/// One flat stocklist row before grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StocklistRow {
    pub id: String,
    pub name: String,
    pub item_name: String,
    pub quantity: u32,
}

impl FromRow for StocklistRow {
    const COLUMNS: &'static [&'static str] = &["id", "name", "itemName", "quantity"];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        Ok(StocklistRow {
            id: row.text("id")?,
            name: row.text("name")?,
            item_name: row.text("itemName")?,
            quantity: row.uint("quantity")?,
        })
    }
}

/// One row of the shiny-rate table
#[derive(Debug, Clone, PartialEq)]
pub struct ShinyRate {
    pub id: String,
    pub plant_id: String,
    pub tier: ShinyTier,
    pub probability: f64,
}

impl FromRow for ShinyRate {
    const COLUMNS: &'static [&'static str] = &["id", "plantId", "tier", "probability"];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        let probability = row.float("probability")?;
        if !(0.0..=1.0).contains(&probability) {
            return Err(row.reject("probability", "probability between 0 and 1"));
        }
        Ok(ShinyRate {
            id: row.text("id")?,
            plant_id: row.text("plantId")?,
            tier: ShinyTier::parse(&row.text("tier")?),
            probability,
        })
    }
}

impl ToRow for ShinyRate {
    const HEADER: &'static [&'static str] = &["id", "plantId", "tier", "probability"];

    fn cell(&self, column: &str) -> Option<String> {
        match column {
            "id" => Some(self.id.clone()),
            "plantId" => Some(self.plant_id.clone()),
            "tier" => Some(self.tier.name().to_string()),
            "probability" => Some(self.probability.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub name: String,
    pub icon: String,
}

/// An icon row tagged with the bucket it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconRow {
    pub bucket: IconBucket,
    pub icon: Icon,
}

impl FromRow for IconRow {
    const COLUMNS: &'static [&'static str] = &["name", "icon", "type"];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        let bucket = IconBucket::parse(&row.text("type")?)
            .ok_or_else(|| row.reject("type", "icon bucket"))?;
        Ok(IconRow {
            bucket,
            icon: Icon {
                name: row.text("name")?,
                icon: row.text("icon")?,
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionHistory {
    pub name: String,
    pub description: String,
    pub identifier: String,
}

impl FromRow for ActionHistory {
    const COLUMNS: &'static [&'static str] = &["name", "description", "identifier"];

    fn from_row(row: &RowView<'_>) -> Result<Self, SchemaError> {
        Ok(ActionHistory {
            name: row.text("name")?,
            description: row.text("description")?,
            identifier: row.text("identifier")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Table;

    const PLANTS: &str = "\
id,name,icon,type,subtype,category,description,value,level,transformId,baseExp,growTime,repeatedGrowTime,numHarvests
0-02-10-05-00,pineapple,🍍,PlacedItem,Plant,Tropical,Spiky,200,0,1-03-10-05-00,20,14400,7200,3
";

    #[test]
    fn test_plant_from_row() {
        let table = Table::parse("plants", PLANTS.as_bytes()).unwrap();
        let plants: Vec<Plant> = table.records().unwrap();
        let plant = &plants[0];
        assert_eq!(plant.item.id, "0-02-10-05-00");
        assert_eq!(plant.item.icon, "🍍");
        assert_eq!(plant.item.item_type, PlacementKind::PlacedItem);
        assert_eq!(plant.item.transform_target(), Some("1-03-10-05-00"));
        assert_eq!(plant.grow_time, 14400);
        assert_eq!(plant.num_harvests, 3);
        assert!(plant.transform_shiny_ids.is_empty());
    }

    #[test]
    fn test_plant_json_shape() {
        let table = Table::parse("plants", PLANTS.as_bytes()).unwrap();
        let plants: Vec<Plant> = table.records().unwrap();
        let json = serde_json::to_value(&plants[0]).unwrap();
        assert_eq!(json["type"], "PlacedItem");
        assert_eq!(json["value"], 200);
        assert_eq!(json["repeatedGrowTime"], 7200);
        assert_eq!(json["transformId"], "1-03-10-05-00");
        assert!(json["transformShinyIds"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_item_without_transform_column() {
        let csv = "id,name,icon,type,subtype,category,description,value,level\n\
                   1-03-10-05-00,pineapple,🍍,InventoryItem,HarvestedItem,Tropical,Sweet,200,0\n";
        let table = Table::parse("harvested", csv.as_bytes()).unwrap();
        let items: Vec<Item> = table.records().unwrap();
        assert_eq!(items[0].transform_id, None);
        let json = serde_json::to_value(&items[0]).unwrap();
        assert!(json.get("transformId").is_none());
    }

    #[test]
    fn test_empty_transform_is_no_link() {
        let csv = "id,name,icon,type,subtype,category,description,value,level,transformId\n\
                   0-00-00-00-00,ground,🟫,PlacedItem,Ground,Ground,Dirt,0,0,\n";
        let table = Table::parse("ground", csv.as_bytes()).unwrap();
        let items: Vec<Item> = table.records().unwrap();
        assert_eq!(items[0].transform_id.as_deref(), Some(""));
        assert_eq!(items[0].transform_target(), None);
    }

    #[test]
    fn test_bad_item_type_rejected() {
        let csv = "id,name,icon,type,subtype,category,description,value,level\n\
                   x,thing,?,Floating,Ground,Ground,Dirt,0,0\n";
        let table = Table::parse("ground", csv.as_bytes()).unwrap();
        let err = table.records::<Item>().err().unwrap();
        assert!(matches!(err, SchemaError::InvalidValue { ref column, .. } if column == "type"));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let csv = "id,name,icon,type,subtype,category,description,value,level\n\
                   x,thing,?,PlacedItem,Ground,Ground,Dirt,cheap,0\n";
        let table = Table::parse("ground", csv.as_bytes()).unwrap();
        let err = table.records::<Item>().err().unwrap();
        assert!(err.to_string().contains("cheap"));
    }

    #[test]
    fn test_egg_optional_growth() {
        let csv = "id,name,icon,type,subtype,category,description,value,level,baseExp,growTime\n\
                   0-06-01-01-00,goose egg,🥚,PlacedItem,PlacedEgg,Goose,Warm,10,0,5,86400\n\
                   1-06-01-01-00,goose egg,🥚,InventoryItem,InventoryEgg,Goose,Warm,10,0,,\n";
        let table = Table::parse("eggs", csv.as_bytes()).unwrap();
        let eggs: Vec<Egg> = table.records().unwrap();
        assert_eq!(eggs[0].base_exp, Some(5));
        assert_eq!(eggs[0].grow_time, Some(86400));
        assert_eq!(eggs[1].grow_time, None);
        let json = serde_json::to_value(&eggs[1]).unwrap();
        assert!(json.get("growTime").is_none());
    }

    #[test]
    fn test_store_from_row() {
        let csv = "id,name,stocklistId,stocklistName,buyMultiplier,sellMultiplier,upgradeMultiplier,restockInterval\n\
                   1,Pierre,1,A,2.0,1,1.5,300000\n";
        let table = Table::parse("stores", csv.as_bytes()).unwrap();
        let stores: Vec<Store> = table.records().unwrap();
        assert_eq!(stores[0].id, 1);
        assert!((stores[0].buy_multiplier - 2.0).abs() < f64::EPSILON);
        assert_eq!(stores[0].restock_interval, 300000);
        let json = serde_json::to_value(&stores[0]).unwrap();
        assert_eq!(json["stocklistName"], "A");
    }

    #[test]
    fn test_shiny_rate_probability_range() {
        let csv = "id,plantId,tier,probability\n1-03-10-05-01,0-02-10-05-00,bronze,1.5\n";
        let table = Table::parse("shinyItemRates", csv.as_bytes()).unwrap();
        assert!(table.records::<ShinyRate>().is_err());
    }

    #[test]
    fn test_icon_bucket_validated() {
        let csv = "name,icon,type\napple,🍎,Plants\nsun,☀️,Weather\n";
        let table = Table::parse("icons", csv.as_bytes()).unwrap();
        let err = table.records::<IconRow>().err().unwrap();
        assert!(matches!(err, SchemaError::InvalidValue { line: 3, .. }));
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("Shovel"), "Shovels");
        assert_eq!(pluralize("Watering Can"), "Watering Cans");
        assert_eq!(pluralize("Brush"), "Brushes");
        assert_eq!(pluralize("Trowel"), "Trowels");
        assert_eq!(pluralize("Battery"), "Batteries");
        assert_eq!(pluralize("Key"), "Keys");
    }
}

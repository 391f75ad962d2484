//! Command handlers for the garden-catalog CLI
//!
//! Each subcommand has its own module with handler functions.

pub mod allocate;
pub mod author;
pub mod build;
pub mod configure;
pub mod tidy;

#[cfg(test)]
pub(crate) mod fixtures {
    use std::fs;
    use std::path::Path;

    const FILES: &[(&str, &str)] = &[
        (
            "items/inventoryItems/blueprints.csv",
            "id,name,icon,type,subtype,category,description,value,level,transformId\n",
        ),
        (
            "items/inventoryItems/harvested.csv",
            "id,name,icon,type,subtype,category,description,value,level\n\
             1-03-01-01-00,garlic,🧄,InventoryItem,HarvestedItem,Onion,Pungent,30,0\n",
        ),
        (
            "items/inventoryItems/seeds.csv",
            "id,name,icon,type,subtype,category,description,value,level,transformId\n\
             1-01-01-01-00,garlic seed,🧄,InventoryItem,Seed,Onion,Plant it,10,0,0-02-01-01-00\n",
        ),
        (
            "items/placedItems/plants.csv",
            "id,name,icon,type,subtype,category,description,value,level,transformId,baseExp,growTime,repeatedGrowTime,numHarvests\n\
             0-02-01-01-00,garlic,🧄,PlacedItem,Plant,Onion,Smelly,30,0,1-03-01-01-00,5,60,0,1\n",
        ),
        (
            "items/placedItems/decorations.csv",
            "id,name,icon,type,subtype,category,description,value,level,transformId\n",
        ),
        (
            "items/placedItems/ground.csv",
            "id,name,icon,type,subtype,category,description,value,level,transformId\n\
             0-00-00-00-00,ground,🟫,PlacedItem,Ground,Ground,Dirt,0,0,\n",
        ),
        (
            "items/placedItems/shinyItemRates.csv",
            "id,plantId,tier,probability\n\
             1-03-01-01-01,0-02-01-01-00,bronze,0.6\n",
        ),
        (
            "garden/tools.csv",
            "id,name,type,icon,description,value,level\n\
             2-00-00-01-00,basic shovel,Shovel,🪏,Dig,0,0\n",
        ),
        (
            "store/stores.csv",
            "id,name,stocklistId,stocklistName,buyMultiplier,sellMultiplier,upgradeMultiplier,restockInterval\n\
             0,General,1,A,2,1,1.5,300000\n",
        ),
        (
            "store/stocklist.csv",
            "id,name,itemName,quantity\n1,A,garlic seed,5\n",
        ),
        ("user/icons.csv", "name,icon,type\ngarlic,🧄,Plants\n"),
        (
            "user/actionHistories.csv",
            "name,description,identifier\nHarvester,Harvested plants,plant:all:harvested\n",
        ),
    ];

    /// Write a small, warning-free source tree under `root`
    pub fn stage_sources(root: &Path) {
        for (rel, content) in FILES {
            let path = root.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }
}

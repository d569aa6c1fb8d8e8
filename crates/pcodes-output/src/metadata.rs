//! `dataset.json`: the catalog metadata published alongside the tables.

use serde::{Deserialize, Serialize};

use pcodes_config::{ProjectConfig, ResourceSpec};

const RESOURCE_FORMAT: &str = "csv";
const WORLD_GROUP: &str = "world";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetMetadata {
    pub name: String,
    pub title: String,
    /// `[{start}T00:00:00 TO *]`, open ended.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_date: Option<String>,
    pub ongoing: bool,
    pub tags: Vec<String>,
    pub groups: Vec<GroupRef>,
    pub resources: Vec<ResourceMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetadata {
    pub name: String,
    pub description: String,
    pub format: String,
    pub p_coded: bool,
}

impl From<&ResourceSpec> for ResourceMetadata {
    fn from(spec: &ResourceSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            format: RESOURCE_FORMAT.to_string(),
            p_coded: spec.p_coded,
        }
    }
}

impl DatasetMetadata {
    pub fn new(config: &ProjectConfig, start_date: Option<&str>) -> Self {
        let resources = &config.resources;
        Self {
            name: config.dataset.name.clone(),
            title: config.dataset.title.clone(),
            dataset_date: start_date.map(|start| format!("[{start}T00:00:00 TO *]")),
            ongoing: true,
            tags: config.dataset.tags.clone(),
            groups: vec![GroupRef {
                name: WORLD_GROUP.to_string(),
            }],
            resources: [&resources.all, &resources.adm_1_2, &resources.lengths]
                .into_iter()
                .map(ResourceMetadata::from)
                .collect(),
        }
    }
}

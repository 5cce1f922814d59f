//! Bundle partitioning.
//!
//! Partitions a set of named bundle declarations into final module sets
//! and inter-bundle dependency sets, with de-duplicated shared
//! ownership of modules that appear in more than one bundle.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scan::dependencies;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// A declared bundle: seed ids to carry, and seed ids assumed supplied
/// elsewhere.
///
/// The wire names in the declaration file are the historical ones:
/// `modules` for the include seeds, `dependencies` for the exclude
/// seeds.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BundleDecl {
    #[serde(rename = "modules", default)]
    pub include: Vec<String>,
    #[serde(rename = "dependencies", default)]
    pub exclude: Vec<String>,
}

/// A planned bundle: the modules it ships and the cross-bundle
/// requirements it expects the loader to satisfy first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BundlePlan {
    pub modules: Vec<String>,
    pub dependencies: Vec<String>,
}

/// Parse a bundle declaration file, preserving declaration order.
pub fn parse_declarations(bytes: &[u8]) -> Result<Vec<(String, BundleDecl)>> {
    let map: serde_json::Map<String, serde_json::Value> =
        serde_json::from_slice(bytes).map_err(|source| Error::Declarations { source })?;
    map.into_iter()
        .map(|(name, value)| {
            let decl = serde_json::from_value(value)
                .map_err(|source| Error::Declarations { source })?;
            Ok((name, decl))
        })
        .collect()
}

/// Partition the declared bundles into final plans.
///
/// For every bundle the include and exclude closures are computed
/// independently; the shipped set is include minus exclude, and the raw
/// requirement set is their intersection. Bundles are processed in
/// reverse declaration order, and each shipped module without a prior
/// owner is claimed by the bundle shipping it (first writer wins under
/// the reversed order, so declaration order controls ownership of
/// shared modules). Raw requirement ids are then rewritten to their
/// owner's bundle name where one exists, and deduplicated.
///
/// Plans are returned in declaration order.
pub async fn plan_bundles(
    declarations: &[(String, BundleDecl)],
    config: &Config,
) -> Result<Vec<(String, BundlePlan)>> {
    let mut owners: HashMap<String, String> = HashMap::new();
    let mut plans: Vec<(String, BundlePlan)> = Vec::with_capacity(declarations.len());

    for (name, decl) in declarations.iter().rev() {
        let exclude = dependencies(&decl.exclude, config).await?;
        let include = dependencies(&decl.include, config).await?;
        let excluded: HashSet<&str> = exclude.iter().map(String::as_str).collect();

        let mut modules = Vec::new();
        let mut requires = Vec::new();
        for id in include {
            if excluded.contains(id.as_str()) {
                requires.push(id);
            } else {
                owners.entry(id.clone()).or_insert_with(|| name.clone());
                modules.push(id);
            }
        }
        debug!(bundle = %name, modules = modules.len(), requires = requires.len(), "planned bundle");
        plans.push((name.clone(), BundlePlan { modules, dependencies: requires }));
    }
    plans.reverse();

    // Second pass: label raw requirement ids with their owning bundle.
    for (_, plan) in &mut plans {
        let mut seen = HashSet::new();
        let raw = std::mem::take(&mut plan.dependencies);
        plan.dependencies = raw
            .into_iter()
            .map(|id| owners.get(&id).cloned().unwrap_or(id))
            .filter(|dep| seen.insert(dep.clone()))
            .collect();
    }

    Ok(plans)
}

/// Render plans as the manifest object consumed by the loader runtime:
/// bundle name to `{modules, dependencies}`.
#[must_use]
pub fn plans_to_json(plans: &[(String, BundlePlan)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (name, plan) in plans {
        map.insert(
            name.clone(),
            json!({ "modules": plan.modules, "dependencies": plan.dependencies }),
        );
    }
    serde_json::Value::Object(map)
}

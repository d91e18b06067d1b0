//! JavaScript bindings (feature `wasm`).

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::alloc::{AllocConfig, AllocProblem, AllocResult, AllocRunner};
use crate::catalog::ResourceCatalog;
use crate::knapsack::{Item, KnapsackConfig, KnapsackResult, KnapsackRunner, KnapsackWindow};

#[derive(Deserialize)]
struct AllocRequest {
    catalog: ResourceCatalog,
    target: i64,
    #[serde(default)]
    config: AllocConfig,
}

#[derive(Deserialize)]
struct KnapsackRequest {
    items: Vec<Item>,
    window: KnapsackWindow,
    #[serde(default)]
    config: KnapsackConfig,
}

/// Solves an allocation request `{ catalog, target, config? }` and
/// returns the serialized `AllocResult`.
#[wasm_bindgen(js_name = solveAllocation)]
pub fn solve_allocation(request: JsValue) -> Result<JsValue, JsValue> {
    let request: AllocRequest = serde_wasm_bindgen::from_value(request)?;
    let problem = AllocProblem::new(request.catalog, request.target);
    let result: AllocResult =
        AllocRunner::run(&problem, &request.config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&result)
}

/// Solves a forward knapsack request `{ items, window, config? }`.
#[wasm_bindgen(js_name = solveKnapsack)]
pub fn solve_knapsack(request: JsValue) -> Result<JsValue, JsValue> {
    let request: KnapsackRequest = serde_wasm_bindgen::from_value(request)?;
    let result: KnapsackResult = KnapsackRunner::run(&request.items, request.window, &request.config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&result)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(JsValue::from)
}

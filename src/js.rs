//! Small helpers for calling into page-global JavaScript libraries.

use js_sys::{Array, Function, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};

/// Calls `target[name](...args)`.
pub fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method: Function = Reflect::get(target, &JsValue::from_str(name))?.dyn_into()?;
    let args: Array = args.iter().collect();
    method.apply(target, &args)
}

/// Resolves a path from the global object, e.g. `["bootstrap", "Modal"]`.
pub fn global(path: &[&str]) -> Result<JsValue, JsValue> {
    let mut target: JsValue = js_sys::global().into();
    for key in path {
        target = Reflect::get(&target, &JsValue::from_str(key))?;
        if target.is_undefined() {
            return Err(JsValue::from_str(&format!("{} is not loaded", key)));
        }
    }
    Ok(target)
}

/// Evaluates `jQuery(target)`, if jQuery is loaded.
pub fn jquery(target: &JsValue) -> Option<JsValue> {
    let jquery: Function = global(&["jQuery"]).ok()?.dyn_into().ok()?;
    jquery.call1(&JsValue::NULL, target).ok()
}

/// Builds a plain object from key/value pairs.
pub fn object(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        if let Err(e) = Reflect::set(&object, &JsValue::from_str(key), value) {
            log::warn!("Failed to set option {}: {:?}", key, e);
        }
    }
    object.into()
}

use smol_str::SmolStr;
use weft_dom::{Dom, DomError, NodeId};

use crate::format::Dataset;

/// Collect the `data-*` attributes of `element`.
pub fn parse_dataset(dom: &Dom, element: NodeId) -> Dataset {
    dom.attributes(element)
        .iter()
        .filter_map(|attr| {
            attr.name
                .strip_prefix("data-")
                .map(|key| (SmolStr::from(key), attr.value.clone()))
        })
        .collect()
}

pub fn apply_dataset(dataset: &Dataset, dom: &mut Dom, element: NodeId) -> Result<(), DomError> {
    for (key, value) in dataset {
        dom.set_attribute(element, &format!("data-{key}"), value.as_str())?;
    }
    Ok(())
}

use weft_dom::{Dom, DomError, NodeId};

use crate::entity::{ENTITY_CLASS, ENTITY_ID_PREFIX, ENTITY_READONLY_CLASS, ENTITY_TYPE_PREFIX};
use crate::format::EntityInfoFormat;

/// Read entity identity off the wrapper's class tokens.
///
/// A wrapper with none of the tokens is a fake entity. Without the
/// read-only token, the read-only flag comes from the live
/// `contenteditable` state.
pub fn parse_entity_format(dom: &Dom, wrapper: NodeId) -> EntityInfoFormat {
    let mut format = EntityInfoFormat::default();
    let mut has_token = false;
    for class in dom.class_names(wrapper) {
        if class == ENTITY_CLASS {
            has_token = true;
        } else if let Some(ty) = class.strip_prefix(ENTITY_TYPE_PREFIX) {
            format.entity_type = Some(ty.into());
            has_token = true;
        } else if let Some(id) = class.strip_prefix(ENTITY_ID_PREFIX) {
            format.id = Some(id.into());
            has_token = true;
        } else if class == ENTITY_READONLY_CLASS {
            format.is_readonly = Some(true);
            has_token = true;
        }
    }
    if !has_token {
        format.is_fake_entity = Some(true);
        format.is_readonly = Some(dom.content_editable(wrapper) == Some(false));
    } else if format.is_readonly.is_none() && dom.content_editable(wrapper) == Some(false) {
        format.is_readonly = Some(true);
    }
    format
}

pub fn apply_entity_format(
    format: &EntityInfoFormat,
    dom: &mut Dom,
    wrapper: NodeId,
) -> Result<(), DomError> {
    let readonly = format.is_readonly == Some(true);
    let editable = format.is_readonly == Some(false);
    if format.is_fake_entity != Some(true) {
        dom.add_class(wrapper, ENTITY_CLASS)?;
        if let Some(ty) = &format.entity_type {
            dom.add_class(wrapper, &format!("{ENTITY_TYPE_PREFIX}{ty}"))?;
        }
        if let Some(id) = &format.id {
            dom.add_class(wrapper, &format!("{ENTITY_ID_PREFIX}{id}"))?;
        }
        if readonly {
            dom.add_class(wrapper, ENTITY_READONLY_CLASS)?;
        }
    }
    if readonly {
        dom.set_attribute(wrapper, "contenteditable", "false")?;
    } else if editable && dom.content_editable(wrapper) == Some(false) {
        dom.remove_attribute(wrapper, "contenteditable")?;
    }
    Ok(())
}

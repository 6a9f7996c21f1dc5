//! Structural conversion between Java `nbt=` item compounds and Bedrock
//! `hasitem=` clauses.

use std::sync::LazyLock;

use regex::Regex;

use crate::nbt::{self, Tag};
use crate::range::{format_f64, format_number, parse_number, Range};
use crate::selector::Parameter;

const MAINHAND: &str = "slot.weapon.mainhand";
const OFFHAND: &str = "slot.weapon.offhand";
const HOTBAR: &str = "slot.hotbar";
const INVENTORY: &str = "slot.inventory";

/// Java `equipment` keys and their Bedrock locations.
const EQUIPMENT_SLOTS: &[(&str, &str)] = &[
    ("head", "slot.armor.head"),
    ("chest", "slot.armor.chest"),
    ("legs", "slot.armor.legs"),
    ("feet", "slot.armor.feet"),
    ("offhand", OFFHAND),
];

static NBT_NUMBER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-?\d+(?:\.\d+)?)[bBsSlLfFdD]?$").expect("NBT number pattern is valid")
});

/// One Bedrock `hasitem` clause.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HasItem {
    pub item: String,
    pub quantity: Option<String>,
    pub location: Option<String>,
    pub slot: Option<String>,
}

impl HasItem {
    fn render(&self) -> String {
        let mut out = format!("{{item={}", self.item);
        for (key, value) in [
            ("quantity", &self.quantity),
            ("location", &self.location),
            ("slot", &self.slot),
        ] {
            if let Some(v) = value {
                out.push_str(&format!(",{}={}", key, v));
            }
        }
        out.push('}');
        out
    }
}

// ── hasitem → nbt ───────────────────────────────────────────────────

/// Collapse a `quantity` value to one representative count: the rounded
/// midpoint of a two-sided range, the present bound of a one-sided range,
/// the value itself for a scalar, and `1` for anything unparsable.
pub fn representative_quantity(text: &str) -> i64 {
    let text = text.trim();
    if text.contains("..") {
        return match Range::parse(text) {
            Ok(r) => match (r.min_value(), r.max_value()) {
                (Some(lo), Some(hi)) => ((lo + hi) / 2.0).round() as i64,
                (Some(n), None) | (None, Some(n)) => n.round() as i64,
                (None, None) => 1,
            },
            Err(_) => 1,
        };
    }
    parse_number(text).map(|n| n.round() as i64).unwrap_or(1)
}

/// Map a Bedrock inventory location (plus its `slot`) onto a Java `Slot`
/// number.
fn location_to_slot(
    location: &str,
    slot: Option<&str>,
    reminders: &mut Vec<String>,
) -> Option<i64> {
    match location {
        MAINHAND => Some(0),
        HOTBAR | INVENTORY => {
            let Some(slot) = slot else {
                reminders.push(format!(
                    "hasitem location {} has no slot; the Java Slot was omitted",
                    location
                ));
                return None;
            };
            if slot.starts_with('!') {
                reminders.push("hasitem slot negation is not supported in Java nbt".to_string());
                return None;
            }
            // A range keeps its first value.
            let first = match Range::parse(slot) {
                Ok(r) => r.min_value().or(r.max_value()),
                Err(_) => parse_number(slot),
            };
            match first {
                Some(n) if n >= 0.0 => Some(n as i64),
                _ => {
                    reminders.push(format!("hasitem slot '{}' is not a valid slot number", slot));
                    None
                }
            }
        }
        other => {
            reminders.push(format!(
                "hasitem location {} has no Java equivalent; the Java Slot was omitted",
                other
            ));
            None
        }
    }
}

/// A quantity that can only be met by holding none of the item.
fn requires_absence(quantity: &str) -> bool {
    let quantity = quantity.trim();
    let upper = if quantity.contains("..") {
        Range::parse(quantity).ok().and_then(|r| r.max_value())
    } else {
        parse_number(quantity)
    };
    upper.is_some_and(|n| n <= 0.0)
}

/// Convert one or more `hasitem` values into Java `nbt` compounds: one
/// `{Inventory:[...]}` for inventory items and one `{equipment:{...}}` for
/// armor and offhand items. Empty when no clause can be expressed.
pub fn hasitem_to_nbt(values: &[String], reminders: &mut Vec<String>) -> Vec<String> {
    let mut entries = Vec::new();
    for raw in values {
        match nbt::parse(raw, '=') {
            Ok(Tag::Compound(e)) => entries.push(Tag::Compound(e)),
            Ok(Tag::List(items)) => entries.extend(items.into_iter().filter(Tag::is_compound)),
            Ok(_) => {}
            Err(err) => {
                log::warn!("unparsable hasitem {}: {}", raw, err);
                reminders.push(format!("hasitem={} could not be parsed and was removed", raw));
            }
        }
    }

    let mut inventory = Vec::new();
    let mut equipment: Vec<(&str, String)> = Vec::new();
    for entry in &entries {
        let Some(item) = entry.get("item").and_then(Tag::as_str) else {
            reminders.push("hasitem clause without an item was skipped".to_string());
            continue;
        };
        let id = if item.contains(':') {
            item.to_string()
        } else {
            format!("minecraft:{}", item)
        };

        if let Some(quantity) = entry.get("quantity").and_then(Tag::as_str) {
            if quantity.starts_with('!') {
                reminders.push("hasitem quantity negation is not supported in Java nbt".to_string());
            } else if requires_absence(quantity) {
                log::warn!("dropping hasitem {} with quantity {}", item, quantity);
                reminders.push(format!(
                    "hasitem {} with quantity={} matches players without the item; Java nbt cannot express absence and the clause was removed",
                    item, quantity
                ));
                continue;
            } else {
                reminders.push(format!(
                    "hasitem quantity {} is represented by count {}; Java nbt does not carry Count",
                    quantity,
                    representative_quantity(quantity)
                ));
            }
        }

        let location = entry.get("location").and_then(Tag::as_str);
        let worn = location.and_then(|l| EQUIPMENT_SLOTS.iter().find(|(_, loc)| *loc == l));
        if let Some(&(key, _)) = worn {
            let value = format!("{{id:\"{}\"}}", id);
            match equipment.iter_mut().find(|(k, _)| *k == key) {
                Some(existing) => existing.1 = value,
                None => equipment.push((key, value)),
            }
            continue;
        }

        let slot = location.and_then(|location| {
            location_to_slot(location, entry.get("slot").and_then(Tag::as_str), reminders)
        });
        inventory.push(match slot {
            Some(n) => format!("{{Slot:{}b,id:\"{}\"}}", n, id),
            None => format!("{{id:\"{}\"}}", id),
        });
    }

    let mut compounds = Vec::new();
    if !inventory.is_empty() {
        compounds.push(format!("{{Inventory:[{}]}}", inventory.join(",")));
    }
    if !equipment.is_empty() {
        let worn: Vec<String> = equipment.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
        compounds.push(format!("{{equipment:{{{}}}}}", worn.join(",")));
    }
    if !compounds.is_empty() {
        reminders.push(
            "hasitem was converted to nbt; item matching may differ between editions".to_string(),
        );
    }
    compounds
}

// ── nbt → hasitem ───────────────────────────────────────────────────

/// Strip an NBT numeric suffix: `3b` → `3`, `1.50f` → `1.5`.
fn nbt_number(text: &str) -> Option<String> {
    let caps = NBT_NUMBER.captures(text.trim())?;
    Some(format_number(&caps[1]))
}

/// Bedrock location for a Java slot number.
pub fn slot_to_location(slot: i64) -> (&'static str, Option<i64>) {
    match slot {
        0 => (MAINHAND, None),
        1 => (OFFHAND, None),
        2..=8 => (HOTBAR, Some(slot)),
        _ => (INVENTORY, Some(slot)),
    }
}

fn item_from(compound: &Tag) -> Option<HasItem> {
    let id = compound.get("id").and_then(Tag::as_str)?;
    let item = id.strip_prefix("minecraft:").unwrap_or(id).to_string();
    let quantity = compound
        .get("Count")
        .or_else(|| compound.get("count"))
        .and_then(Tag::as_str)
        .and_then(nbt_number)
        .map(|n| format!("{}..", n));
    Some(HasItem {
        item,
        quantity,
        ..HasItem::default()
    })
}

/// Apply a Java `Slot` to an item. Returns false for slots that cannot be
/// expressed (negative ones).
fn place(item: &mut HasItem, slot_tag: &Tag, reminders: &mut Vec<String>) -> bool {
    let Some(slot) = slot_tag
        .as_str()
        .and_then(nbt_number)
        .and_then(|n| parse_number(&n))
    else {
        reminders.push("nbt Slot is not a number and was ignored".to_string());
        return true;
    };
    if slot < 0.0 {
        reminders.push(format!(
            "nbt Slot {} has no Bedrock location; the item was skipped",
            format_f64(slot)
        ));
        return false;
    }
    let (location, index) = slot_to_location(slot as i64);
    item.location = Some(location.to_string());
    item.slot = index.map(|n| n.to_string());
    true
}

/// What one Java `nbt` compound carries for Bedrock: the items it
/// requires and the `tag` / `type` parameters for its entity markers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NbtItems {
    pub items: Vec<HasItem>,
    pub extras: Vec<Parameter>,
}

/// Read the item and entity markers out of a Java `nbt` compound. Returns
/// `None` when it carries none of them and should pass through as-is.
pub fn nbt_items(raw: &str, reminders: &mut Vec<String>) -> Option<NbtItems> {
    let tag = match nbt::parse(raw, ':') {
        Ok(tag) if tag.is_compound() => tag,
        Ok(_) => return None,
        Err(err) => {
            log::debug!("nbt {} is not structurally convertible: {}", raw, err);
            return None;
        }
    };
    log::debug!("converting nbt {}", nbt::describe(&tag));

    let mut found = NbtItems::default();
    if let Some(selected) = tag.get("SelectedItem") {
        if let Some(mut item) = item_from(selected) {
            let keep = match selected.get("Slot") {
                Some(slot) => place(&mut item, slot, reminders),
                None => {
                    item.location = Some(MAINHAND.to_string());
                    true
                }
            };
            if keep {
                found.items.push(item);
            }
        }
    }
    if let Some(inventory) = tag.get("Inventory").and_then(Tag::as_list) {
        for entry in inventory {
            let Some(mut item) = item_from(entry) else { continue };
            let keep = match entry.get("Slot") {
                Some(slot) => place(&mut item, slot, reminders),
                None => true,
            };
            if keep {
                found.items.push(item);
            }
        }
    }
    if let Some(Tag::Compound(worn)) = tag.get("equipment") {
        for (key, entry) in worn {
            let Some(&(_, location)) = EQUIPMENT_SLOTS.iter().find(|(k, _)| *k == key.as_str()) else {
                reminders.push(format!(
                    "nbt equipment slot {} has no Bedrock location and was skipped",
                    key
                ));
                continue;
            };
            if let Some(mut item) = item_from(entry) {
                item.location = Some(location.to_string());
                found.items.push(item);
            }
        }
    }
    if let Some(item) = tag.get("Item").and_then(item_from) {
        found.items.push(item);
    }
    if let Some(item) = item_from(&tag) {
        found.items.push(item);
    }

    if let Some(tags) = tag.get("Tags").and_then(Tag::as_list) {
        if let Some(first) = tags.iter().find_map(Tag::as_str) {
            found.extras.push(Parameter::new("tag", first));
            if tags.len() > 1 {
                reminders.push(format!(
                    "nbt Tags lists {} tags; only the first ({}) was kept",
                    tags.len(),
                    first
                ));
            }
        }
    }
    if let Some(kind) = tag.get("Type").and_then(Tag::as_str) {
        found.extras.push(Parameter::new("type", kind));
    }

    if found.items.is_empty() && found.extras.is_empty() {
        return None;
    }
    reminders.push(format!(
        "nbt={} was converted structurally; matching may be partial",
        raw
    ));
    Some(found)
}

/// A single `hasitem` parameter for all items: the object form for one
/// item, the array form for several.
pub fn hasitem_parameter(items: &[HasItem]) -> Option<Parameter> {
    match items {
        [] => None,
        [item] => Some(Parameter::new("hasitem", &item.render())),
        _ => {
            let rendered: Vec<String> = items.iter().map(HasItem::render).collect();
            Some(Parameter::new("hasitem", &format!("[{}]", rendered.join(","))))
        }
    }
}

/// Convert one Java `nbt` compound into Bedrock parameters (`hasitem`, and
/// `tag` / `type` for the entity markers).
pub fn nbt_to_hasitem(raw: &str, reminders: &mut Vec<String>) -> Option<Vec<Parameter>> {
    let found = nbt_items(raw, reminders)?;
    let mut params: Vec<Parameter> = hasitem_parameter(&found.items).into_iter().collect();
    params.extend(found.extras);
    Some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(params: &[Parameter]) -> Vec<String> {
        params.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn quantity_midpoint() {
        assert_eq!(representative_quantity("3..5"), 4);
        assert_eq!(representative_quantity("2.5..3.5"), 3);
        assert_eq!(representative_quantity("7.."), 7);
        assert_eq!(representative_quantity("..2"), 2);
        assert_eq!(representative_quantity("6"), 6);
        assert_eq!(representative_quantity("lots"), 1);
    }

    #[test]
    fn hotbar_and_inventory_slots() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(
            r#"{Inventory:[{Slot:8b,id:"minecraft:apple"}]}"#,
            &mut reminders,
        )
        .unwrap();
        assert_eq!(
            rendered(&params),
            ["hasitem={item=apple,location=slot.hotbar,slot=8}"]
        );
        assert_eq!(reminders.len(), 1);

        let params = nbt_to_hasitem(
            r#"{Inventory:[{Slot:21b,id:"minecraft:stone"}]}"#,
            &mut reminders,
        )
        .unwrap();
        assert_eq!(
            rendered(&params),
            ["hasitem={item=stone,location=slot.inventory,slot=21}"]
        );
    }

    #[test]
    fn selected_item_with_count() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(
            r#"{SelectedItem:{id:"minecraft:diamond_sword",Count:2b}}"#,
            &mut reminders,
        )
        .unwrap();
        assert_eq!(
            rendered(&params),
            ["hasitem={item=diamond_sword,quantity=2..,location=slot.weapon.mainhand}"]
        );
    }

    #[test]
    fn several_items_form_a_list() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(
            r#"{Inventory:[{Slot:0b,id:"minecraft:apple"},{id:"minecraft:bread"}]}"#,
            &mut reminders,
        )
        .unwrap();
        assert_eq!(
            rendered(&params),
            ["hasitem=[{item=apple,location=slot.weapon.mainhand},{item=bread}]"]
        );
    }

    #[test]
    fn tags_and_type() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(r#"{Tags:["boss","minion"],Type:"zombie"}"#, &mut reminders)
            .unwrap();
        assert_eq!(rendered(&params), ["tag=boss", "type=zombie"]);
        assert_eq!(reminders.len(), 2);
    }

    #[test]
    fn unrelated_nbt_passes_through() {
        let mut reminders = Vec::new();
        assert!(nbt_to_hasitem("{OnGround:1b}", &mut reminders).is_none());
        assert!(nbt_to_hasitem("{}", &mut reminders).is_none());
        assert!(nbt_to_hasitem("{broken", &mut reminders).is_none());
        assert!(reminders.is_empty());
    }

    #[test]
    fn negative_slots_are_skipped() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(r#"{Inventory:[{Slot:-106b,id:"shield"}]}"#, &mut reminders);
        assert!(params.is_none());
        assert_eq!(reminders.len(), 1);
    }

    #[test]
    fn hasitem_to_inventory_and_equipment() {
        let mut reminders = Vec::new();
        let nbt = hasitem_to_nbt(
            &[
                "{item=apple,location=slot.hotbar,slot=3}".to_string(),
                "[{item=minecraft:shield,location=slot.weapon.offhand},{item=bread}]".to_string(),
            ],
            &mut reminders,
        );
        assert_eq!(
            nbt,
            [
                r#"{Inventory:[{Slot:3b,id:"minecraft:apple"},{id:"minecraft:bread"}]}"#,
                r#"{equipment:{offhand:{id:"minecraft:shield"}}}"#,
            ]
        );
    }

    #[test]
    fn armor_locations_become_equipment() {
        let mut reminders = Vec::new();
        let nbt = hasitem_to_nbt(
            &["[{item=iron_helmet,location=slot.armor.head},{item=iron_boots,location=slot.armor.feet},{item=gold_helmet,location=slot.armor.head}]".to_string()],
            &mut reminders,
        );
        assert_eq!(
            nbt,
            [r#"{equipment:{head:{id:"minecraft:gold_helmet"},feet:{id:"minecraft:iron_boots"}}}"#]
        );
    }

    #[test]
    fn equipment_becomes_armor_locations() {
        let mut reminders = Vec::new();
        let params = nbt_to_hasitem(
            r#"{equipment:{head:{id:"minecraft:diamond_helmet"},offhand:{id:"minecraft:shield",count:1},saddle:{id:"minecraft:saddle"}}}"#,
            &mut reminders,
        )
        .unwrap();
        assert_eq!(
            rendered(&params),
            ["hasitem=[{item=diamond_helmet,location=slot.armor.head},{item=shield,quantity=1..,location=slot.weapon.offhand}]"]
        );
        assert!(reminders.iter().any(|r| r.contains("saddle")));
    }

    #[test]
    fn zero_quantity_is_not_a_match() {
        assert!(requires_absence("0"));
        assert!(requires_absence("..0"));
        assert!(requires_absence("0..0"));
        assert!(!requires_absence("0.."));
        assert!(!requires_absence("1"));

        let mut reminders = Vec::new();
        let nbt = hasitem_to_nbt(&["{item=apple,quantity=0}".to_string()], &mut reminders);
        assert!(nbt.is_empty());
        assert_eq!(reminders.len(), 1);
        assert!(reminders[0].contains("quantity=0"));
    }

    #[test]
    fn hasitem_slot_range_keeps_first_value() {
        let mut reminders = Vec::new();
        let nbt = hasitem_to_nbt(
            &["{item=apple,quantity=3..5,location=slot.inventory,slot=4..9}".to_string()],
            &mut reminders,
        );
        assert_eq!(nbt, [r#"{Inventory:[{Slot:4b,id:"minecraft:apple"}]}"#]);
        assert!(reminders.iter().any(|r| r.contains("count 4")));
    }

    #[test]
    fn unknown_location_omits_slot() {
        let mut reminders = Vec::new();
        let nbt = hasitem_to_nbt(
            &["{item=iron_ingot,location=slot.enderchest,slot=2}".to_string()],
            &mut reminders,
        );
        assert_eq!(nbt, [r#"{Inventory:[{id:"minecraft:iron_ingot"}]}"#]);
        assert!(reminders.iter().any(|r| r.contains("slot.enderchest")));
    }
}

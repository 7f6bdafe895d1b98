// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Tobias Sarnowski <tobias@sarnowski.cloud>

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::value::hash_bytes;

fn key(text: &str) -> Rc<ObjString> {
    Rc::new(ObjString::new(text.into(), hash_bytes(text.as_bytes())))
}

#[test]
fn set_reports_whether_key_was_new() {
    let mut table = Table::new();
    let k = key("a");
    assert!(table.set(&k, Value::number(1.0)));
    assert!(!table.set(&k, Value::number(2.0)));
    assert_eq!(table.get(&k).unwrap().as_number(), Some(2.0));
}

#[test]
fn get_on_missing_key_returns_none() {
    let table = Table::new();
    let k = key("missing");
    assert!(table.get(&k).is_none());
}

#[test]
fn delete_then_get_returns_none_but_reuses_slot() {
    let mut table = Table::new();
    let k = key("a");
    table.set(&k, Value::bool(true));
    assert!(table.delete(&k));
    assert!(table.get(&k).is_none());
    assert!(!table.delete(&k));
}

#[test]
fn tombstones_do_not_break_probe_chains() {
    let mut table = Table::new();
    let a = key("a");
    let b = key("b");
    table.set(&a, Value::number(1.0));
    table.set(&b, Value::number(2.0));
    table.delete(&a);
    assert_eq!(table.get(&b).unwrap().as_number(), Some(2.0));
}

#[test]
fn grows_past_load_factor() {
    let mut table = Table::new();
    let keys: Vec<_> = (0..50).map(|i| key(&format!("k{i}"))).collect();
    for (i, k) in keys.iter().enumerate() {
        table.set(k, Value::number(i as f64));
    }
    for (i, k) in keys.iter().enumerate() {
        assert_eq!(table.get(k).unwrap().as_number(), Some(i as f64));
    }
    assert_eq!(table.len(), 50);
}

#[test]
fn find_interned_locates_by_content_not_identity() {
    let mut table = Table::new();
    let a = key("needle");
    table.set(&a, Value::nil());
    let found = table
        .find_interned(b"needle", hash_bytes(b"needle"))
        .expect("content match");
    assert!(Rc::ptr_eq(&found, &a));
    assert!(table.find_interned(b"absent", hash_bytes(b"absent")).is_none());
}

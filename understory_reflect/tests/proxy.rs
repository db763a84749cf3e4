// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Proxies over a shared object: reads, writes and failure modes.

use std::cell::RefCell;
use std::rc::Rc;

use understory_reflect::{
    ErasedValue, ObjectType, PropertyDescriptor, PropertyProxy, ReflectError, TypeKind,
    VarTable, VarValue, object_ref,
};

#[derive(Clone, Debug, PartialEq)]
struct Hint(&'static str);

struct Account {
    email: String,
    logins: u64,
    verified: bool,
}

struct Invoice {
    total: f64,
}

fn account_type() -> ObjectType {
    ObjectType::new::<Account>()
        .with(
            PropertyDescriptor::builder::<Account, String>("Email")
                .getter(|a| a.email.clone())
                .setter(|a, v| a.email = v)
                .annotate(Hint("user@example.com"))
                .build(),
        )
        .with(
            PropertyDescriptor::builder::<Account, u64>("Logins")
                .getter(|a| a.logins)
                .build(),
        )
        .with(
            PropertyDescriptor::builder::<Account, bool>("Verified")
                .setter(|a, v| a.verified = v)
                .build(),
        )
}

fn account() -> understory_reflect::ObjectRef {
    object_ref(Account {
        email: "old@example.com".into(),
        logins: 3,
        verified: false,
    })
}

#[test]
fn proxies_share_the_target() {
    let ty = account_type();
    let target = account();
    let proxies = ty.proxies(&target).unwrap();

    assert_eq!(
        proxies.iter().map(PropertyProxy::name).collect::<Vec<_>>(),
        ["Email", "Logins", "Verified"]
    );

    proxies[0].set(String::from("new@example.com")).unwrap();
    let again = ty.proxy(&target, "Email").unwrap().unwrap();
    assert_eq!(again.get::<String>().unwrap(), "new@example.com");
    assert!(again.same_as(&proxies[0]));
    assert!(!again.same_as(&proxies[1]));

    proxies[2].set(true).unwrap();
    assert!(target.try_borrow().unwrap().downcast_ref::<Account>().unwrap().verified);
}

#[test]
fn declared_types_and_annotations() {
    let ty = account_type();
    let target = account();

    let email = ty.proxy(&target, "Email").unwrap().unwrap();
    assert_eq!(email.value_type().kind(), TypeKind::Text);
    assert_eq!(email.annotations().first::<Hint>(), Some(&Hint("user@example.com")));

    let logins = ty.proxy(&target, "Logins").unwrap().unwrap();
    assert!(logins.value_type().is_numeric());
    assert!(logins.annotations().is_empty());

    assert!(ty.proxy(&target, "Password").unwrap().is_none());
}

#[test]
fn missing_accessors_are_access_errors() {
    let ty = account_type();
    let target = account();

    let logins = ty.proxy(&target, "Logins").unwrap().unwrap();
    let err = logins.set(4_u64).unwrap_err();
    assert_eq!(err, ReflectError::NotWritable { property: "Logins" });
    assert!(err.is_access_error());

    let verified = ty.proxy(&target, "Verified").unwrap().unwrap();
    assert!(verified.get_value().unwrap_err().is_access_error());
}

#[test]
fn wrong_value_type_is_invalid_argument() {
    let ty = account_type();
    let email = ty.proxy(&account(), "Email").unwrap().unwrap();

    let err = email.set_value(ErasedValue::new(7_i32)).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.property(), "Email");

    assert!(email.get::<u64>().unwrap_err().is_invalid_argument());
}

#[test]
fn descriptor_from_another_type_is_rejected() {
    let ty = account_type();
    let invoice = object_ref(Invoice { total: 9.5 });
    let err = ty.proxy(&invoice, "Email").unwrap_err();
    assert!(matches!(err, ReflectError::OwnerMismatch { property: "Email", .. }));

    let total = PropertyDescriptor::builder::<Invoice, f64>("Total")
        .getter(|i| i.total)
        .build();
    let proxy = PropertyProxy::new(invoice, total).unwrap();
    assert_eq!(proxy.get::<f64>().unwrap(), 9.5);
}

#[test]
fn busy_target_is_reported() {
    let ty = account_type();
    let target = account();
    let email = ty.proxy(&target, "Email").unwrap().unwrap();

    let _guard = target.try_borrow_mut().unwrap();
    assert_eq!(
        email.get_value().unwrap_err(),
        ReflectError::TargetBorrowed { property: "Email" }
    );
}

#[test]
fn proxies_can_be_made_while_target_is_in_use() {
    let ty = account_type();
    let target = account();

    let guard = target.try_borrow_mut().unwrap();
    let proxies = ty.proxies(&target).unwrap();
    assert_eq!(proxies.len(), 3);
    drop(guard);

    assert_eq!(proxies[1].get::<u64>().unwrap(), 3);
}

#[test]
fn var_table_filters_and_notifies() {
    let mut table = VarTable::with_accepted_keys(["theme", "zoom"]);
    table.set_none_value(VarValue::Text("unset".into()));

    let changes = Rc::new(RefCell::new(Vec::new()));
    let log = changes.clone();
    let id = table.subscribe(move |key| log.borrow_mut().push(*key));

    assert!(table.try_set("zoom", 1.25));
    assert!(!table.try_set("font", "serif"));
    assert_eq!(table.get(&"zoom").and_then(VarValue::as_float), Some(1.25));
    assert_eq!(table.get(&"theme").and_then(VarValue::as_text), Some("unset"));
    assert!(table.get(&"font").is_none());

    assert!(table.remove(&"zoom").is_some());
    assert!(table.remove(&"zoom").is_none());
    assert!(table.unsubscribe(id));
    assert!(table.try_set("theme", "dark"));

    assert_eq!(*changes.borrow(), ["zoom", "zoom"]);
}

//! # Bootstrap Handler Tests

use super::*;
use crate::adapters::InMemoryObjectTree;
use lwm2m_types::ids::*;
use lwm2m_types::{ObjectInstance, ObjectTree, ResourceValue, SecurityMode};
use std::thread;

const BS: CallerRole = CallerRole::BootstrapServer;

fn consistent_tree() -> ObjectTree {
    ObjectTree::new()
        .with(
            ObjectInstance::new(SECURITY, 0)
                .with(SEC_SERVER_URI, ResourceValue::String("coap://bs:5683".into()))
                .with(SEC_BOOTSTRAP, ResourceValue::Boolean(true))
                .with(SEC_SECURITY_MODE, ResourceValue::Integer(SecurityMode::NoSec.code())),
        )
        .with(
            ObjectInstance::new(SECURITY, 1)
                .with(SEC_SERVER_URI, ResourceValue::String("coap://dm:5683".into()))
                .with(SEC_BOOTSTRAP, ResourceValue::Boolean(false))
                .with(SEC_SECURITY_MODE, ResourceValue::Integer(SecurityMode::NoSec.code()))
                .with(SEC_SERVER_ID, ResourceValue::UnsignedInteger(101)),
        )
        .with(
            ObjectInstance::new(SERVER, 0)
                .with(SRV_SERVER_ID, ResourceValue::UnsignedInteger(101))
                .with(SRV_LIFETIME, ResourceValue::UnsignedInteger(300))
                .with(SRV_BINDING, ResourceValue::String("U".into())),
        )
        .with(
            ObjectInstance::new(DEVICE, 0)
                .with(DEV_SUPPORTED_BINDING, ResourceValue::String("U".into())),
        )
}

fn handler_for(tree: ObjectTree) -> (BootstrapHandler, Arc<InMemoryObjectTree>) {
    let objects = Arc::new(InMemoryObjectTree::new(tree));
    (BootstrapHandler::new(objects.clone()), objects)
}

fn handler() -> BootstrapHandler {
    handler_for(consistent_tree()).0
}

#[test]
fn test_try_init_session_once() {
    let handler = handler();
    assert!(!handler.is_bootstrapping());
    assert!(handler.try_init_session());
    assert!(!handler.try_init_session());
    assert!(handler.is_bootstrapping());

    handler.close_session();
    assert!(!handler.is_bootstrapping());
    assert!(handler.try_init_session());
}

#[test]
fn test_wait_times_out_without_finish() {
    let handler = handler();
    assert!(handler.try_init_session());
    assert_eq!(
        handler.wait_bootstrap_finished(Duration::from_millis(50)),
        Ok(false)
    );
    // the wait never closes the session
    assert!(handler.is_bootstrapping());
}

#[test]
fn test_wait_without_session() {
    assert_eq!(
        handler().wait_bootstrap_finished(Duration::from_millis(10)),
        Ok(false)
    );
}

#[test]
fn test_wait_returns_when_finished_concurrently() {
    let handler = Arc::new(handler());
    assert!(handler.try_init_session());

    let server = {
        let handler = handler.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            let reply = handler.finished(&BS);
            assert_eq!(reply.response.code, ResponseCode::Changed);
            reply.completion.unwrap().acknowledged();
        })
    };

    assert_eq!(handler.wait_bootstrap_finished(Duration::from_secs(1)), Ok(true));
    server.join().unwrap();
}

#[test]
fn test_completion_waits_for_acknowledgement() {
    let handler = handler();
    assert!(handler.try_init_session());

    let reply = handler.finished(&BS);
    let completion = reply.completion.unwrap();
    assert_eq!(
        handler.wait_bootstrap_finished(Duration::from_millis(20)),
        Ok(false)
    );

    completion.acknowledged();
    assert_eq!(
        handler.wait_bootstrap_finished(Duration::from_millis(20)),
        Ok(true)
    );
}

#[test]
fn test_non_authority_rejected_and_state_unchanged() {
    let (handler, objects) = handler_for(consistent_tree());
    assert!(handler.try_init_session());
    let before = objects.snapshot();

    let dm = CallerRole::DeviceManagement { short_server_id: 101 };
    let reply = handler.finished(&dm);
    assert_eq!(reply.response.code, ResponseCode::BadRequest);
    assert!(reply.completion.is_none());

    let response = handler.delete(&CallerRole::System, &LwM2mPath::Root);
    assert_eq!(response.code, ResponseCode::BadRequest);

    assert_eq!(objects.snapshot(), before);
    assert!(handler.is_bootstrapping());
    assert_eq!(
        handler.wait_bootstrap_finished(Duration::from_millis(10)),
        Ok(false)
    );
}

#[test]
fn test_rejected_outside_session() {
    let (handler, objects) = handler_for(consistent_tree());

    let reply = handler.finished(&BS);
    assert_eq!(reply.response.code, ResponseCode::BadRequest);
    assert_eq!(
        reply.response.error_message.as_deref(),
        Some("no pending bootstrap session")
    );

    let response = handler.delete(&BS, &LwM2mPath::Root);
    assert_eq!(response.code, ResponseCode::BadRequest);
    assert_eq!(objects.snapshot().instance_count(SECURITY), 2);
}

#[test]
fn test_inconsistent_objects_not_acceptable() {
    let mut tree = consistent_tree();
    tree.instance_mut(DEVICE, 0)
        .unwrap()
        .resources
        .remove(&DEV_SUPPORTED_BINDING);
    let (handler, _) = handler_for(tree);
    assert!(handler.try_init_session());

    let reply = handler.finished(&BS);
    assert_eq!(reply.response.code, ResponseCode::NotAcceptable);
    assert!(reply
        .response
        .error_message
        .unwrap_or_default()
        .contains("Device"));
    assert!(reply.completion.is_none());
}

#[test]
fn test_delete_keeps_device_and_bootstrap_entry() {
    let (handler, objects) = handler_for(consistent_tree());
    assert!(handler.try_init_session());

    let response = handler.delete(&BS, &LwM2mPath::Root);
    assert_eq!(response.code, ResponseCode::Deleted);

    let remaining: Vec<String> = objects
        .snapshot()
        .instance_paths()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(remaining, vec!["/0/0", "/3/0"]);

    let response = handler.delete(&BS, &LwM2mPath::object(DEVICE));
    assert_eq!(response.code, ResponseCode::BadRequest);
}

#[test]
fn test_close_interrupts_waiter() {
    let handler = Arc::new(handler());
    assert!(handler.try_init_session());

    let waiter = {
        let handler = handler.clone();
        thread::spawn(move || handler.wait_bootstrap_finished(Duration::from_secs(5)))
    };
    thread::sleep(Duration::from_millis(100));
    handler.close_session();

    assert_eq!(waiter.join().unwrap(), Err(WaitError::Interrupted));
    assert!(!handler.is_bootstrapping());
}

#[test]
fn test_default_wait_uses_settings() {
    let handler = handler().with_settings(BootstrapHandlerSettings {
        wait_timeout: Duration::from_millis(10),
    });
    assert!(handler.try_init_session());
    assert_eq!(handler.wait_bootstrap_finished_default(), Ok(false));
}

#[test]
fn test_huge_timeout_still_interruptible() {
    let handler = Arc::new(handler());
    assert!(handler.try_init_session());

    let waiter = {
        let handler = handler.clone();
        thread::spawn(move || handler.wait_bootstrap_finished(Duration::from_secs(u64::MAX)))
    };
    thread::sleep(Duration::from_millis(100));
    handler.close_session();

    assert_eq!(waiter.join().unwrap(), Err(WaitError::Interrupted));
}

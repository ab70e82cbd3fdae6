//! CLI smoke entry point.
//!
//! Runs the user lifecycle scenario against a fresh in-memory repository and
//! prints one JSON envelope per step. Logging is enabled when
//! `RECSTORE_LOG_DIR` is set.

use recstore_core::api::{respond, respond_created, respond_deleted, respond_page, to_json};
use recstore_core::logging::{init_with, LogSettings};
use recstore_core::{core_version, MemoryRepository, NewUser, User, UserPatch, UserService};
use serde::Serialize;
use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(err) = LogSettings::from_env().and_then(|settings| settings.map(init_with).transpose())
    {
        eprintln!("logging disabled: {err}");
    }

    println!("recstore_core version={}", core_version());

    let service = UserService::new(MemoryRepository::<User>::new());
    let alice = service.create_user(NewUser {
        username: "alice".to_string(),
        email: "a@x.com".to_string(),
    });
    let Some(alice_id) = alice.as_ref().ok().map(|record| record.id) else {
        eprintln!("initial create failed");
        return ExitCode::FAILURE;
    };

    let steps = [
        print_step("create alice", &respond_created(alice)),
        print_step(
            "create duplicate username",
            &respond_created(service.create_user(NewUser {
                username: "alice".to_string(),
                email: "b@x.com".to_string(),
            })),
        ),
        print_step(
            "update email",
            &respond(service.update_user(alice_id, UserPatch::email("c@x.com"))),
        ),
        print_step("list", &respond_page(service.list_users(1, 10))),
        print_step("delete", &respond_deleted(service.delete_user(alice_id))),
        print_step("get deleted", &respond(service.get_user(alice_id))),
    ];

    if steps.iter().all(|printed| *printed) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_step<D: Serialize>(label: &str, response: &recstore_core::ApiResponse<D>) -> bool {
    match to_json(response) {
        Ok(json) => {
            println!("{label}: {json}");
            true
        }
        Err(err) => {
            eprintln!("{label}: failed to render response: {err}");
            false
        }
    }
}

//! Errors produced by concurrent workers and folded into one value.

use errkit::{append, BoxError, Error, ErrorList, JsonError, JsonErrorList, Sentinel, Value};
use tokio::sync::mpsc;

static SENTINEL: Sentinel = Sentinel::new("Sentinel error");

async fn perform_operation(id: u32) -> Result<(), Error> {
    if id == 2 {
        return Ok(());
    }
    Err(errkit::with_stack!(SENTINEL.clone(), "id", id))
}

async fn do_operations_concurrently() -> Option<BoxError> {
    let (tx, mut rx) = mpsc::channel(3);
    for id in 1..=3 {
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Err(err) = perform_operation(id).await {
                let _ = tx.send(err).await;
            }
        });
    }
    drop(tx);

    let mut result: Option<BoxError> = None;
    while let Some(err) = rx.recv().await {
        result = append(result, Some(err));
    }
    result
}

#[tokio::test(flavor = "multi_thread", worker_threads = 3)]
async fn test_errors_from_concurrent_workers() {
    let err = do_operations_concurrently().await.expect("two workers failed");
    let list = err.downcast_ref::<ErrorList>().expect("an error list");

    assert_eq!(list.len(), 2);
    assert!(list.is(&SENTINEL));
    assert!(errkit::is(err.as_ref(), &SENTINEL));
    assert!(errkit::unwrap(err.as_ref()).is_none());

    let members: Vec<&Error> = list
        .iter()
        .map(|member| member.downcast_ref::<Error>().expect("errkit member"))
        .collect();
    let expected = serde_json::to_string(
        &members.iter().map(|m| m.to_string()).collect::<Vec<_>>(),
    )
    .unwrap();
    assert_eq!(list.to_string(), expected);

    let mut ids: Vec<u64> = members
        .iter()
        .map(|m| m.details().get("id").and_then(Value::as_u64).expect("id detail"))
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, [1, 3]);

    for member in &members {
        assert_eq!(member.message(), "Sentinel error");
        assert!(member.function().contains("perform_operation"));
        assert_eq!(member.file(), file!());
    }
    assert_eq!(members[0].line_number(), members[1].line_number());
}

#[tokio::test]
async fn test_error_list_json_form() {
    let err = do_operations_concurrently().await.unwrap();
    let list = err.downcast_ref::<ErrorList>().unwrap();

    let decoded = JsonErrorList::from_json(&list.to_json().unwrap()).unwrap();
    assert_eq!(decoded.message, "2 errors have occurred");
    for member in &decoded.errors {
        let member: &JsonError = member.as_error().expect("nested errkit error");
        assert_eq!(member.message, "Sentinel error");
        assert!(member.details.contains_key("id"));
    }

    let texts: Vec<String> = serde_json::from_str(&list.to_string()).unwrap();
    for text in texts {
        let member = JsonError::from_json(&text).unwrap();
        assert_eq!(member.message, "Sentinel error");
    }
}

#[tokio::test]
async fn test_single_failure_is_not_a_list() {
    let (tx, mut rx) = mpsc::channel::<Error>(1);
    tokio::spawn(async move {
        let _ = tx.send(errkit::new!("only failure")).await;
    });

    let mut result: Option<BoxError> = None;
    while let Some(err) = rx.recv().await {
        result = append(result, Some(err));
    }

    let err = result.unwrap();
    assert!(err.downcast_ref::<ErrorList>().is_none());
    assert_eq!(err.downcast_ref::<Error>().unwrap().message(), "only failure");
}

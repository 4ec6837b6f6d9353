//! RestResourceApi against a local HTTP server standing in for the upstream
//! REST API.

use std::net::SocketAddr;
use std::sync::Mutex;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Map, Value, json};
use url::Url;

use hotel_desk::domain::RecordId;
use hotel_desk::domain::ports::{ResourceApi, ResourceApiError};
use hotel_desk::outbound::rest::RestResourceApi;

#[derive(Default)]
struct Upstream {
    employees: Mutex<Vec<Value>>,
    reservations: Mutex<Vec<Value>>,
}

async fn list_employees(state: web::Data<Upstream>) -> HttpResponse {
    let records = state.employees.lock().expect("lock").clone();
    HttpResponse::Ok().json(records)
}

async fn create_employee(
    state: web::Data<Upstream>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let mut records = state.employees.lock().expect("lock");
    let mut record = body.into_inner();
    record.insert(
        "_id".to_owned(),
        json!({ "$oid": format!("oid{}", records.len() + 1) }),
    );
    let stored = Value::Object(record);
    records.push(stored.clone());
    HttpResponse::Created().json(stored)
}

async fn update_employee(
    state: web::Data<Upstream>,
    path: web::Path<String>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let id = path.into_inner();
    let mut records = state.employees.lock().expect("lock");
    let Some(slot) = records
        .iter_mut()
        .find(|record| record["_id"]["$oid"] == json!(id))
    else {
        return HttpResponse::NotFound().body("not found");
    };
    let mut record = body.into_inner();
    record.insert("_id".to_owned(), json!({ "$oid": id }));
    *slot = Value::Object(record);
    HttpResponse::Ok().finish()
}

async fn delete_employee(state: web::Data<Upstream>, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut records = state.employees.lock().expect("lock");
    let before = records.len();
    records.retain(|record| record["_id"]["$oid"] != json!(id));
    if records.len() == before {
        HttpResponse::NotFound().finish()
    } else {
        HttpResponse::Ok().json(json!({ "deleted": id }))
    }
}

async fn list_reservations(state: web::Data<Upstream>) -> HttpResponse {
    let records = state.reservations.lock().expect("lock").clone();
    HttpResponse::Ok().json(records)
}

async fn acknowledge_reservation(
    state: web::Data<Upstream>,
    body: web::Json<Map<String, Value>>,
) -> HttpResponse {
    let mut records = state.reservations.lock().expect("lock");
    let mut record = body.into_inner();
    record.insert("_id".to_owned(), json!(records.len() + 1));
    records.push(Value::Object(record));
    HttpResponse::Created().json(json!({ "mensaje": "Reservación creada" }))
}

async fn broken_inventory() -> HttpResponse {
    HttpResponse::InternalServerError().body("{\n  \"error\": \"db down\"\n}")
}

fn start_upstream() -> SocketAddr {
    let state = web::Data::new(Upstream::default());
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/api/empleados", web::get().to(list_employees))
            .route("/api/empleados", web::post().to(create_employee))
            .route("/api/empleados/{id}", web::put().to(update_employee))
            .route("/api/empleados/{id}", web::delete().to(delete_employee))
            .route("/api/reservaciones", web::get().to(list_reservations))
            .route("/api/reservaciones", web::post().to(acknowledge_reservation))
            .route("/api/inventarios", web::get().to(broken_inventory))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind upstream");
    let addr = server.addrs()[0];
    actix_rt::spawn(server.run());
    addr
}

fn base_url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).expect("valid base")
}

fn payload(value: Value) -> Map<String, Value> {
    let Value::Object(map) = value else {
        panic!("payload fixture is an object");
    };
    map
}

#[actix_web::test]
async fn crud_cycle_against_upstream() {
    let base = base_url(start_upstream());
    let api = RestResourceApi::new(&base, "empleados", None).expect("adapter");

    assert!(api.list().await.expect("empty list").is_empty());

    let created = api
        .create(&payload(json!({ "nombre": "Ana", "salario": 2500000 })))
        .await
        .expect("created")
        .expect("upstream echoes the stored record");
    assert_eq!(created.id().as_str(), "oid1");
    assert_eq!(created.get("salario"), Some(&json!(2500000)));

    let updated = api
        .update(
            created.id(),
            &payload(json!({ "nombre": "Ana María", "salario": 2600000 })),
        )
        .await
        .expect("updated");
    assert_eq!(updated.id(), created.id());
    assert_eq!(updated.text("nombre"), "Ana María");

    let listed = api.list().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].text("nombre"), "Ana María");

    api.delete(created.id()).await.expect("deleted");
    assert!(api.list().await.expect("list").is_empty());
}

#[actix_web::test]
async fn acknowledged_create_without_id_is_a_success() {
    let base = base_url(start_upstream());
    let api = RestResourceApi::new(&base, "reservaciones", None).expect("adapter");

    let created = api
        .create(&payload(json!({ "nombre": "Ana", "habitacion": "204" })))
        .await
        .expect("acknowledged create");

    assert!(created.is_none());
    let listed = api.list().await.expect("list");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id().as_str(), "1");
    assert_eq!(listed[0].text("habitacion"), "204");
}

#[actix_web::test]
async fn missing_record_maps_to_operation_error() {
    let base = base_url(start_upstream());
    let api = RestResourceApi::new(&base, "empleados", None).expect("adapter");
    let id = RecordId::new("ghost").expect("valid id");

    let err = api.delete(&id).await.expect_err("no such record");
    assert!(matches!(err, ResourceApiError::Delete { .. }));
    assert_eq!(err.message(), "status 404");

    let err = api
        .update(&id, &payload(json!({ "nombre": "Nadie" })))
        .await
        .expect_err("no such record");
    assert!(matches!(err, ResourceApiError::Update { .. }));
    assert_eq!(err.message(), "status 404: not found");
}

#[actix_web::test]
async fn server_error_carries_status_and_body_preview() {
    let base = base_url(start_upstream());
    let api = RestResourceApi::new(&base, "inventarios", None).expect("adapter");

    let err = api.list().await.expect_err("upstream failure");

    assert!(matches!(err, ResourceApiError::Fetch { .. }));
    assert_eq!(err.message(), "status 500: { \"error\": \"db down\" }");
}

#[actix_web::test]
async fn unreachable_upstream_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let api = RestResourceApi::new(&base_url(addr), "empleados", None).expect("adapter");

    let err = api.list().await.expect_err("connection refused");

    assert!(err.message().starts_with("transport error"));
}

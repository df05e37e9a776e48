use crate::io_struct::{ChatReply, ChatReqInput};
use crate::relay_state::{RelayConfig, RelayError, RelayState};
use actix_cors::Cors;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, HttpServer, get, post, web};
use std::io::Write;

#[get("/")]
pub async fn home(_req: HttpRequest) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(include_str!("../static/index.html"))
}

#[get("/health")]
pub async fn health(_req: HttpRequest, _: web::Data<RelayState>) -> HttpResponse {
    HttpResponse::Ok().body("Ok")
}

#[post("/get_response")]
pub async fn get_response(
    _req: HttpRequest,
    req: web::Json<ChatReqInput>,
    app_state: web::Data<RelayState>,
) -> Result<HttpResponse, RelayError> {
    let req = req.into_inner();
    let reply = app_state
        .chat(req.session_id.as_deref(), &req.user_input)
        .await?;
    Ok(HttpResponse::Ok().json(ChatReply { reply }))
}

// A missing or malformed body would otherwise bypass RelayError and return
// actix's plain-text 400; route it through the same JSON envelope.
fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    RelayError::Validation(format!("invalid request body: {}", err)).into()
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(home)
        .service(health)
        .service(get_response);
}

pub async fn startup(config: RelayConfig, relay_state: RelayState) -> std::io::Result<()> {
    let app_state = web::Data::new(relay_state);

    println!("Starting server at {}:{}", config.host, config.port);

    // default level is info
    env_logger::Builder::new()
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, log::LevelFilter::Info)
        .init();

    let allowed_origin = config.allowed_origin.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&allowed_origin)
            .allow_any_method()
            .allow_any_header();
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(cors)
            .app_data(app_state.clone())
            .configure(app_config)
    })
    .bind((config.host, config.port))?
    .run()
    .await?;

    std::io::Result::Ok(())
}

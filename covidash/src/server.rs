//! Development-mode HTTP server for the composed dashboard page.
//!
//! The page is rendered once from the startup tables and then served
//! unchanged; there is no routing beyond `GET /` and no write path.

use actix_web::middleware::Logger;
use actix_web::web;
use actix_web::App;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;

use crate::dashboard::Dashboard;

async fn index(page: web::Data<String>) -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(page.get_ref().clone())
}

/// Binds `listen_addr` and blocks for the lifetime of the process
pub async fn serve(dashboard: &Dashboard, listen_addr: &str) -> anyhow::Result<()> {
    let page = web::Data::new(dashboard.render_html()?);
    log::info!("starting HTTP server on http://{listen_addr}");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(page.clone())
            .route("/", web::get().to(index))
    })
    .bind(listen_addr)?
    .run()
    .await?;
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    laporan_harian_server::run().await
}

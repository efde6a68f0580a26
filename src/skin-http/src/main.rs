use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::Server;
use log::{debug, info};
use skin_serve::{RemoteAnalyzer, SkinAnalyzer};
use std::convert::Infallible;
use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "skin-http",
    about = "HTTP endpoint that runs uploaded images through a skin analysis model"
)]
struct CmdArgs {
    #[structopt(long, env = "SKIN_HOST", default_value = "127.0.0.1", help = "Address to listen on")]
    host: IpAddr,

    #[structopt(long, env = "SKIN_PORT", default_value = "5000", help = "Port to listen on")]
    port: u16,

    #[structopt(long, env = "SKIN_ANALYZER_URL", help = "Endpoint of the skin analysis model server")]
    analyzer_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    let args = CmdArgs::from_args();

    let backend = RemoteAnalyzer::new(&args.analyzer_url)?;
    info!("Forwarding analysis to {}", backend.endpoint());

    let analyzer: Arc<dyn SkinAnalyzer> = Arc::new(backend);

    let make_service = make_service_fn(move |conn: &AddrStream| {
        let analyzer = Arc::clone(&analyzer);
        let remote = conn.remote_addr();

        let service = service_fn(move |req| {
            debug!("Request from {}", remote);
            skin_serve::http::handle(req, Arc::clone(&analyzer))
        });

        async move { Ok::<_, Infallible>(service) }
    });

    let addr = SocketAddr::new(args.host, args.port);
    let server = Server::bind(&addr).serve(make_service);
    info!("Listening on http://{}", server.local_addr());

    server.await?;

    Ok(())
}

use no_std_net::SocketAddr;
use toad_msg::TryFromBytes;
use toad_resource::net::Addrd;
use toad_resource::platform::{Alloc, Message};
use toad_resource::resource::{Access, Params, Resource};
use toad_resource::server::Server;

const PORT: u16 = 5683;

fn coap_addr(addr: std::net::SocketAddr) -> SocketAddr {
  match addr {
    | std::net::SocketAddr::V4(a) => {
      SocketAddr::V4(no_std_net::SocketAddrV4::new(a.ip().octets().into(), a.port()))
    },
    | std::net::SocketAddr::V6(a) => {
      SocketAddr::V6(no_std_net::SocketAddrV6::new(a.ip().octets().into(),
                                                   a.port(),
                                                   a.flowinfo(),
                                                   a.scope_id()))
    },
  }
}

fn main() {
  simple_logger::init_with_level(log::Level::Trace).unwrap();

  let sock = std::net::UdpSocket::bind(("0.0.0.0", PORT)).unwrap();
  let mut server: Server<Alloc, _> = Server::new(sock, Default::default());

  let params = Params { resource_type: Some(b"temperature-c".to_vec()),
                        ..Default::default() };
  server.create(&mut Resource::stored("sensors/temp", Access::GET, "21.5").with_params(params))
        .unwrap();
  server.create(&mut Resource::stored("motd", Access::GET | Access::PUT, "hello, world!"))
        .unwrap();

  log::info!("serving coap://0.0.0.0:{}", PORT);
  log::info!("try: GET /motd, GET /.well-known/core, PUT /anything");

  let mut buf = [0u8; 1152];
  loop {
    let (n, addr) = server.transport().recv_from(&mut buf).unwrap();

    match Message::<Alloc>::try_from_bytes(&buf[..n]) {
      | Err(e) => log::warn!("ignoring malformed datagram from {}: {:?}", addr, e),
      | Ok(msg) => {
        if let Err(e) = server.process(Addrd(msg, coap_addr(addr))) {
          log::warn!("failed to answer {}: {:?}", addr, e);
        }
      },
    }
  }
}

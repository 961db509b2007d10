//! Host transports backed by std sockets

use std::io::{self, Read, Write};
use std::net::{Ipv4Addr, TcpListener, TcpStream, UdpSocket};
use std::time::Duration as StdDuration;

use myrtio_strip_controller::{
    DatagramTransport, Request, RequestHandler, RequestServer, Response,
};

/// Largest request head we read from a client
const REQUEST_HEAD_MAX: usize = 1024;

/// Read buffer for one datagram, larger than any valid command
const DATAGRAM_MAX: usize = 64;

/// How long a connected client may take to send its request line
const READ_TIMEOUT: StdDuration = StdDuration::from_millis(200);

/// Non-blocking UDP socket delivering raw command datagrams
pub(crate) struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    pub(crate) fn bind(port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, port))?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket })
    }
}

impl DatagramTransport for UdpTransport {
    fn receive(&mut self, buf: &mut [u8]) -> Option<usize> {
        let mut datagram = [0u8; DATAGRAM_MAX];
        match self.socket.recv(&mut datagram) {
            Ok(len) => {
                let copied = len.min(buf.len());
                buf[..copied].copy_from_slice(&datagram[..copied]);
                Some(len)
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => None,
            // Some platforms fail the read of an oversized datagram after
            // consuming it; report it as too long so it gets discarded.
            Err(e) => {
                eprintln!("udp: receive failed: {e}");
                Some(DATAGRAM_MAX + 1)
            }
        }
    }
}

/// Minimal HTTP/1.0 server answering one connection per poll
pub(crate) struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    pub(crate) fn bind(port: u16) -> io::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))?;
        listener.set_nonblocking(true)?;
        Ok(Self { listener })
    }

    fn serve<H: RequestHandler>(stream: &mut TcpStream, handler: &mut H) -> io::Result<()> {
        stream.set_nonblocking(false)?;
        stream.set_read_timeout(Some(READ_TIMEOUT))?;

        let mut head = [0u8; REQUEST_HEAD_MAX];
        let mut filled = 0;
        while filled < head.len() {
            let read = stream.read(&mut head[filled..])?;
            if read == 0 {
                break;
            }
            filled += read;
            if head[..filled].windows(2).any(|pair| pair == b"\r\n") {
                break;
            }
        }

        let response = match request_target(&head[..filled]) {
            Some(target) => handler.handle(&Request::parse(target)),
            None => Response::bad_request("malformed request"),
        };
        write_response(stream, &response)
    }
}

impl RequestServer for HttpServer {
    fn poll<H: RequestHandler>(&mut self, handler: &mut H) -> bool {
        let Ok((mut stream, _)) = self.listener.accept() else {
            return false;
        };
        if let Err(e) = Self::serve(&mut stream, handler) {
            eprintln!("http: connection failed: {e}");
        }
        true
    }
}

/// Target of a `GET <target> HTTP/1.x` request line
fn request_target(head: &[u8]) -> Option<&str> {
    let line = head.split(|&byte| byte == b'\n').next()?;
    let line = std::str::from_utf8(line).ok()?.trim_end();
    let mut parts = line.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("GET"), Some(target), Some(version)) if version.starts_with("HTTP/") => {
            Some(target)
        }
        _ => None,
    }
}

fn write_response(stream: &mut TcpStream, response: &Response) -> io::Result<()> {
    let body = response.body();
    write!(
        stream,
        "HTTP/1.0 {} {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status.code(),
        response.status.reason_phrase(),
        body.len(),
        body
    )?;
    stream.flush()
}

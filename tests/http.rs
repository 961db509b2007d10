mod tests {
    use core::fmt::Write;

    use myrtio_strip_controller::http::MAX_BODY_LEN;
    use myrtio_strip_controller::{Request, Response, Status};

    #[test]
    fn test_parse_request_target() {
        let request = Request::parse("/set?d=0&c=h&v=ff");
        assert_eq!(request.path(), "/set");
        assert_eq!(request.arg("d"), Some("0"));
        assert_eq!(request.arg("c"), Some("h"));
        assert_eq!(request.arg("v"), Some("ff"));
        assert_eq!(request.arg("x"), None);
    }

    #[test]
    fn test_parse_edge_cases() {
        let request = Request::parse("/get");
        assert_eq!(request.path(), "/get");
        assert_eq!(request.args().count(), 0);

        let request = Request::parse("/get?&flag&d=&d=1");
        assert_eq!(request.arg("flag"), Some(""));
        assert_eq!(request.arg("d"), Some(""));
        assert_eq!(request.args().count(), 3);

        let request = Request::parse("/x?a=1&b=2&c=3&d=4&e=5&f");
        assert_eq!(request.args().count(), 6);
        assert_eq!(request.arg("e"), Some("5"));
        assert_eq!(request.arg("f"), Some(""));

        let request = Request::new("/get");
        assert_eq!(request.path(), "/get");
        assert_eq!(request.arg("d"), None);
    }

    #[test]
    fn test_status() {
        assert_eq!(Status::Ok.code(), 200);
        assert_eq!(Status::BadRequest.code(), 400);
        assert_eq!(Status::NotFound.reason_phrase(), "Not Found");
        assert_eq!(Status::InternalError.code(), 500);
        assert_eq!(Status::InternalError.reason_phrase(), "Internal Server Error");
    }

    #[test]
    fn test_response_body() {
        let response = Response::not_found();
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(response.body(), "Page doesn't exist");

        let long = "x".repeat(MAX_BODY_LEN + 10);
        assert_eq!(Response::ok(&long).body().len(), MAX_BODY_LEN);

        let mut response = Response::ok("");
        write!(response, "{:03}", 7).unwrap();
        assert_eq!(response.body(), "007");
        assert!(write!(response, "{}", long).is_err());
    }
}

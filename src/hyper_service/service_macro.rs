#[macro_export]
macro_rules! router_service {
    {@entry $router:expr, @, $prefix:expr, $sub_router:expr} => {
        $router.insert_router($prefix, $sub_router)
    };
    {@entry $router:expr, ANY, $pattern:expr, $data:expr} => {
        $router.route("*", $pattern, $data)
    };
    {@entry $router:expr, $method:ident, $pattern:expr, $data:expr} => {
        $router.route(stringify!($method), $pattern, $data)
    };

    {$($method:tt $pattern:expr => $data:expr),+ ; _ => $default:expr} => {{
        let mut __router: $crate::HttpRouter<$crate::BoxHandler> = $crate::HttpRouter::new();
        $($crate::router_service!(@entry __router, $method, $pattern, $data);)+
        __router.with_default($default)
    }};

    {$($method:tt $pattern:expr => $data:expr),+} => {{
        let mut __router: $crate::HttpRouter<$crate::BoxHandler> = $crate::HttpRouter::new();
        $($crate::router_service!(@entry __router, $method, $pattern, $data);)+
        __router
    }};
}

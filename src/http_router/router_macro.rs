#[macro_export]
macro_rules! http_router {
    {@entry $router:expr, @, $prefix:expr, $sub_router:expr} => {
        $router.insert_router($prefix, $sub_router)
    };
    {@entry $router:expr, ANY, $pattern:expr, $data:expr} => {
        $router.handle("*", $pattern, $data)
    };
    {@entry $router:expr, $method:ident, $pattern:expr, $data:expr} => {
        $router.handle(stringify!($method), $pattern, $data)
    };

    {$($method:tt $pattern:expr => $data:expr),+ $(,)?} => {{
        let mut __router = $crate::HttpRouter::new();
        $($crate::http_router!(@entry __router, $method, $pattern, $data);)+
        __router
    }};
}

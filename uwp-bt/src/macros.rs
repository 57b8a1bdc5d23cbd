#![macro_use]

/// Build a `&'static [ConfigEntry<$ty>]` from `"Key" => field` pairs.
///
/// Every accessor is a plain `fn` item so the table is a `const`.
macro_rules! config_table {
    ($ty:ty { $($key:literal => $field:ident),* $(,)? }) => {
        &[$(
            crate::conf::schema::ConfigEntry {
                key: $key,
                handler: None,
                access: {
                    fn access(target: &mut $ty) -> crate::conf::schema::FieldMut<'_> {
                        crate::conf::schema::FieldMut::from(&mut target.$field)
                    }
                    access
                },
            }
        ),*]
    };
}

/// Emit `$field`s of `$src` into a [`CommandBuf`](crate::cmd::CommandBuf), in order.
///
/// Scalars and arrays are both accepted; arrays go out element by element.
macro_rules! put_fields {
    ($buf:expr, $src:expr; $($field:ident),* $(,)?) => {{
        $( crate::cmd::Put::put_into(&$src.$field, $buf)?; )*
    }};
}

// Partner destinations. Each exposes its actions through `actions()`.

pub mod friendbuy;

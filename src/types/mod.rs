pub mod city_profile;
pub mod composite;
pub mod field;
pub mod readings;

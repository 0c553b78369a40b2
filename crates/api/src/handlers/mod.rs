pub mod carro;
